use std::env;
use std::fs;
use std::path::Path;

/// Generates the built-in rule manifest from `assets/rules/` so the bundled
/// catalog and the code that loads it cannot drift apart.
fn main() {
    println!("cargo:rerun-if-changed=assets/rules");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR not set");
    let rules_dir = Path::new(&manifest_dir).join("assets/rules");

    let mut names: Vec<String> = fs::read_dir(&rules_dir)
        .expect("assets/rules directory is missing")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(String::from))
        .collect();
    names.sort();

    let mut generated = String::new();
    generated.push_str("/// Built-in rule catalog, enumerated at build time.\n");
    generated.push_str("pub static BUILTIN_RULES: &[(&str, &str)] = &[\n");
    for name in &names {
        generated.push_str(&format!(
            "    (\"{name}\", include_str!(concat!(env!(\"CARGO_MANIFEST_DIR\"), \"/assets/rules/{name}\"))),\n"
        ));
    }
    generated.push_str("];\n");

    fs::write(Path::new(&out_dir).join("builtin_rules.rs"), generated)
        .expect("failed to write builtin rule manifest");
}
