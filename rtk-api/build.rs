use std::fs;
use std::path::PathBuf;

fn field(contents: &str, key: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        if k.trim() == key {
            Some(v.trim().to_string())
        } else {
            None
        }
    })
}

fn number(contents: &str, key: &str) -> u32 {
    match field(contents, key) {
        Some(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{} is not a number: {:?}", key, v)),
        None => 0,
    }
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let out_dir = std::env::var("OUT_DIR").unwrap();

    // The version file can be swapped by the board build without touching the crate
    let version_file = std::env::var("RTK_VERSION_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(&manifest_dir).join("VERSION"));

    let contents = fs::read_to_string(&version_file)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", version_file.display(), e));

    let major = number(&contents, "VERSION_MAJOR");
    let minor = number(&contents, "VERSION_MINOR");
    let patch = number(&contents, "PATCHLEVEL");
    let extra = field(&contents, "EXTRAVERSION").unwrap_or_default();

    assert!(minor <= 0xff && patch <= 0xff, "minor/patch must fit in one byte");

    let string = if extra.is_empty() {
        format!("{}.{}.{}", major, minor, patch)
    } else {
        format!("{}.{}.{}-{}", major, minor, patch, extra)
    };

    let generated = format!(
        "// generated by build.rs from {}\n\
         pub const KERNEL_VERSION_MAJOR: u32 = {};\n\
         pub const KERNEL_VERSION_MINOR: u32 = {};\n\
         pub const KERNEL_PATCHLEVEL: u32 = {};\n\
         pub const KERNEL_VERSION_STRING: &str = {:?};\n",
        version_file.display(),
        major,
        minor,
        patch,
        string
    );

    fs::write(PathBuf::from(out_dir).join("version.rs"), generated).unwrap();

    println!("cargo:rerun-if-env-changed=RTK_VERSION_FILE");
    println!("cargo:rerun-if-changed={}", version_file.display());
}
