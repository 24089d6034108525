//! Build script for visage-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates face.toml and compiles it into `FACE_CONFIG`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    generate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated face.toml values, defaults filled in
struct FaceToml {
    duration_s: f64,
    intensity: f64,
    mouth_speed: f64,
    anim_duration_s: f64,
    settle_ms: i64,
    blink_base_ms: i64,
    blink_jitter_ms: i64,
    yawn_base_ms: i64,
    yawn_jitter_ms: i64,
    yawn_hold_ms: i64,
    pupil_range: i64,
    cell_size: i64,
}

impl Default for FaceToml {
    fn default() -> Self {
        Self {
            duration_s: 65.5,
            intensity: 0.4,
            mouth_speed: 0.5,
            anim_duration_s: 5.0,
            settle_ms: 500,
            blink_base_ms: 3000,
            blink_jitter_ms: 2000,
            yawn_base_ms: 10_000,
            yawn_jitter_ms: 5000,
            yawn_hold_ms: 800,
            pupil_range: 3,
            cell_size: 20,
        }
    }
}

/// Validate face.toml and write `face_config.rs` into OUT_DIR
fn generate_config() {
    println!("cargo:rerun-if-changed=face.toml");

    let config_path = Path::new("face.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: face.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a face.toml configuration file.           ║\n\
            ║  Please create one in the visage-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read face.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in face.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    let mut face = FaceToml::default();

    if let Some(section) = table(&config, "expression", &mut errors) {
        read_float(section, "expression", "duration_s", 0.0, 86_400.0, &mut face.duration_s, &mut errors);
        read_float(section, "expression", "intensity", 0.0, 100.0, &mut face.intensity, &mut errors);
        read_float(section, "expression", "mouth_speed", 0.0, 100.0, &mut face.mouth_speed, &mut errors);
        read_float(section, "expression", "anim_duration_s", 0.0, 86_400.0, &mut face.anim_duration_s, &mut errors);
    }

    if let Some(section) = table(&config, "dispatch", &mut errors) {
        read_int(section, "dispatch", "settle_ms", 0, 60_000, &mut face.settle_ms, &mut errors);
    }

    if let Some(section) = table(&config, "idle", &mut errors) {
        read_int(section, "idle", "blink_base_ms", 0, 600_000, &mut face.blink_base_ms, &mut errors);
        read_int(section, "idle", "blink_jitter_ms", 0, 600_000, &mut face.blink_jitter_ms, &mut errors);
        read_int(section, "idle", "yawn_base_ms", 0, 3_600_000, &mut face.yawn_base_ms, &mut errors);
        read_int(section, "idle", "yawn_jitter_ms", 0, 3_600_000, &mut face.yawn_jitter_ms, &mut errors);
        read_int(section, "idle", "yawn_hold_ms", 0, 10_000, &mut face.yawn_hold_ms, &mut errors);
        read_int(section, "idle", "pupil_range", 0, 5, &mut face.pupil_range, &mut errors);
    }

    if let Some(section) = table(&config, "display", &mut errors) {
        // 12 cells across a 240 px wide panel
        read_int(section, "display", "cell_size", 1, 20, &mut face.cell_size, &mut errors);
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid face configuration                               ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("face_config.rs"), render(&face)).unwrap();

    println!("cargo:warning=face.toml validated successfully");
}

/// Look up an optional `[section]`, which must be a table if present
fn table<'a>(
    config: &'a toml::Value,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::value::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => None,
    }
}

fn read_float(
    section: &toml::value::Table,
    section_name: &str,
    key: &str,
    min: f64,
    max: f64,
    out: &mut f64,
    errors: &mut Vec<String>,
) {
    let value = match section.get(key) {
        Some(toml::Value::Float(v)) => *v,
        Some(toml::Value::Integer(v)) => *v as f64,
        Some(_) => {
            errors.push(format!("[{}] {} must be a number", section_name, key));
            return;
        }
        None => return,
    };
    if !(min..=max).contains(&value) {
        errors.push(format!("[{}] {} must be {}-{}", section_name, key, min, max));
        return;
    }
    *out = value;
}

fn read_int(
    section: &toml::value::Table,
    section_name: &str,
    key: &str,
    min: i64,
    max: i64,
    out: &mut i64,
    errors: &mut Vec<String>,
) {
    match section.get(key) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => *out = *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section_name, key, min, max));
        }
        Some(_) => errors.push(format!("[{}] {} must be an integer", section_name, key)),
        None => {}
    }
}

/// Emit the generated constants
fn render(face: &FaceToml) -> String {
    format!(
        "// Generated by build.rs from face.toml\n\
         \n\
         pub const FACE_CONFIG: FaceConfig = FaceConfig {{\n\
         \x20   expression: ExpressionDefaults {{\n\
         \x20       duration_s: {:?}_f32,\n\
         \x20       intensity: {:?}_f32,\n\
         \x20       mouth_speed: {:?}_f32,\n\
         \x20       anim_duration_s: {:?}_f32,\n\
         \x20   }},\n\
         \x20   settle_ms: {},\n\
         \x20   idle: IdleTiming {{\n\
         \x20       blink_base_ms: {},\n\
         \x20       blink_jitter_ms: {},\n\
         \x20       yawn_base_ms: {},\n\
         \x20       yawn_jitter_ms: {},\n\
         \x20       yawn_hold_ms: {},\n\
         \x20       pupil_range: {},\n\
         \x20   }},\n\
         }};\n\
         \n\
         pub const CELL_SIZE: u16 = {};\n",
        face.duration_s,
        face.intensity,
        face.mouth_speed,
        face.anim_duration_s,
        face.settle_ms,
        face.blink_base_ms,
        face.blink_jitter_ms,
        face.yawn_base_ms,
        face.yawn_jitter_ms,
        face.yawn_hold_ms,
        face.pupil_range,
        face.cell_size,
    )
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", truncate_chars(line, 61))
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Longest prefix of `s` with at most `max` characters
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

