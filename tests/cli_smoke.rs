use std::path::PathBuf;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_dungeon-playback")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "dungeon-playback.exe"
            } else {
                "dungeon-playback"
            });
            p
        })
}

#[test]
fn cli_dump_then_play_script_writes_frames() {
    let dir = PathBuf::from("target").join("cli_smoke");
    let frames = dir.join("frames");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let script_path = dir.join("script.json");
    let final_path = dir.join("final.png");

    let status = std::process::Command::new(exe())
        .args(["dump", "--seed", "3", "--out"])
        .arg(&script_path)
        .status()
        .unwrap();
    assert!(status.success());

    let script: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&script_path).unwrap()).unwrap();
    assert_eq!(script.len(), 10);

    let output = std::process::Command::new(exe())
        .args(["play", "--no-pacing", "--script"])
        .arg(&script_path)
        .arg("--out-dir")
        .arg(&frames)
        .arg("--final")
        .arg(&final_path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rendered=9"), "{stdout}");

    assert!(final_path.exists());
    assert!(frames.join("frame_00008.png").exists());
    assert!(!frames.join("frame_00009.png").exists());
}

#[test]
fn cli_strict_rejects_ambiguous_script() {
    let dir = PathBuf::from("target").join("cli_smoke_strict");
    std::fs::create_dir_all(&dir).unwrap();
    let script_path = dir.join("script.json");
    std::fs::write(
        &script_path,
        r#"[{"color":0,"origin_x":0,"origin_y":0,"w":4,"h":4},
            {"color":1,"origin_x":0,"origin_y":0,"w":0,"h":0},
            {"color":1,"origin_x":1,"origin_y":1,"w":3,"h":3},
            {"color":1,"origin_x":0,"origin_y":0,"w":0,"h":0}]"#,
    )
    .unwrap();

    let status = std::process::Command::new(exe())
        .args(["play", "--no-pacing", "--strict", "--script"])
        .arg(&script_path)
        .status()
        .unwrap();
    assert!(!status.success());

    let output = std::process::Command::new(exe())
        .args(["play", "--no-pacing", "--script"])
        .arg(&script_path)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("rendered=1"));
}

#[test]
fn cli_seed_conflicts_with_script() {
    let dir = PathBuf::from("target").join("cli_smoke_seed_script");
    std::fs::create_dir_all(&dir).unwrap();
    let script_path = dir.join("script.json");
    std::fs::write(
        &script_path,
        r#"[{"color":1,"origin_x":0,"origin_y":0,"w":0,"h":0},
            {"color":1,"origin_x":0,"origin_y":0,"w":0,"h":0}]"#,
    )
    .unwrap();

    let output = std::process::Command::new(exe())
        .args(["play", "--no-pacing", "--seed", "3", "--script"])
        .arg(&script_path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--seed"));

    // A script opening with a sentinel-equal entry still plays its first frame.
    let output = std::process::Command::new(exe())
        .args(["play", "--no-pacing", "--strict", "--script"])
        .arg(&script_path)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("rendered=1"));
}
