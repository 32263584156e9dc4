//! Build script for detecting system dependencies of the optional `video` feature.
//!
//! Only probes for OpenCV when the feature is enabled; the core analysis has no
//! native dependencies.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_VIDEO");

    if env::var_os("CARGO_FEATURE_VIDEO").is_some() {
        check_opencv();
        check_onnxruntime();
    }
}

fn check_opencv() {
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    let found = ["opencv4", "opencv"].iter().find_map(|name| {
        Command::new("pkg-config")
            .args(["--modversion", name])
            .output()
            .ok()
            .filter(|output| output.status.success())
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
    });

    match found {
        Some(version) => println!("cargo:warning=Found OpenCV version: {version}"),
        None => {
            println!("cargo:warning=OpenCV not found via pkg-config. The `video` feature needs it.");
            println!("cargo:warning=On Ubuntu: sudo apt-get install libopencv-dev clang libclang-dev");
            println!("cargo:warning=On macOS: brew install opencv");
        }
    }
}

fn check_onnxruntime() {
    println!("cargo:rerun-if-env-changed=ORT_LIB_LOCATION");
    if env::var_os("ORT_LIB_LOCATION").is_none() {
        println!("cargo:warning=ORT_LIB_LOCATION not set; ort will download a prebuilt ONNX Runtime");
    }
}
