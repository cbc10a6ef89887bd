#![forbid(unsafe_code)]

/// `embed_migrations!` is a proc-macro and is not rerun when only the SQL
/// files change, so the crate is rebuilt whenever the directory is touched.
fn main() {
    println!("cargo:rerun-if-changed=./migrations");
}
