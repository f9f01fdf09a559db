use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    // memory.x нужен только при сборке прошивки под голое железо
    let target = env::var("TARGET").unwrap_or_default();
    if target.starts_with("thumbv6m") {
        let out = PathBuf::from(env::var("OUT_DIR").unwrap());
        fs::write(out.join("memory.x"), include_bytes!("memory.x")).unwrap();
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
