use std::env;
use std::fs;
use std::path::PathBuf;

// PAPI_VER_CURRENT is a function-like macro in papi.h, so it is generated
// here from PAPI_VERSION ("major.minor") instead.
const DEFAULT_PAPI_VERSION: &str = "7.0";

fn main() {
    println!("cargo:rerun-if-env-changed=PAPI_VERSION");

    if env::var_os("CARGO_FEATURE_PAPI").is_some() {
        println!("cargo:rustc-link-lib=dylib=papi");
    }
    if env::var_os("CARGO_FEATURE_MUSCLE2").is_some() {
        println!("cargo:rustc-link-lib=dylib=muscle2");
    }

    let version = env::var("PAPI_VERSION").unwrap_or_else(|_| DEFAULT_PAPI_VERSION.to_string());
    let (major, minor) = parse_version(&version)
        .unwrap_or_else(|| panic!("PAPI_VERSION must look like \"7.0\", got {:?}", version));

    let out_path = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set by cargo"));
    fs::write(
        out_path.join("papi_version.rs"),
        format!(
            "/// `PAPI_VERSION_NUMBER(major, minor, 0, 0) & 0xffff0000`\n\
             pub const PAPI_VER_CURRENT: ::libc::c_int = {:#010x};\n",
            (major << 24) | (minor << 16)
        ),
    )
    .expect("failed to write generated papi version");
}

fn parse_version(v: &str) -> Option<(u32, u32)> {
    let mut parts = v.trim().split('.');
    let major = parts.next()?.parse::<u32>().ok()?;
    let minor = parts.next().unwrap_or("0").parse::<u32>().ok()?;
    if major > 0x7f || minor > 0xff {
        return None;
    }
    Some((major, minor))
}
