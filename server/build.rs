//! Build script for snapcam-server
//!
//! Rebuild the server whenever the page or the wasm-pack output changes,
//! since both are embedded into the binary.

fn main() {
    println!("cargo:rerun-if-changed=static");
    println!("cargo:rerun-if-changed=static/public");
}
