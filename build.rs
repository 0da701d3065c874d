use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OCI_LIB_DIR");
    if env::var("CARGO_FEATURE_STATIC_LINK").is_ok() {
        if let Ok(dir) = env::var("OCI_LIB_DIR") {
            println!("cargo:rustc-link-search=native={}", dir);
        }
        if env::var("CARGO_CFG_WINDOWS").is_ok() {
            println!("cargo:rustc-link-lib=oci");
        } else {
            println!("cargo:rustc-link-lib=clntsh");
        }
    }
}
