//! End-to-end test of the `rscodec` binary: encode a file, corrupt a byte,
//! decode, and confirm the payload round-trips.

use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rscodec"))
}

#[test]
fn encode_decode_round_trip_through_cli() {
    let dir = tempdir();
    let input_path = dir.join("payload.bin");
    let encoded_path = dir.join("encoded.bin");
    let decoded_path = dir.join("decoded.bin");

    let payload = b"the quick brown fox jumped over!!!!".to_vec(); // 36 bytes, 3 rows of k=12
    std::fs::write(&input_path, &payload).unwrap();

    let status = bin()
        .args([
            "encode",
            "--n",
            "20",
            "--k",
            "12",
            input_path.to_str().unwrap(),
            encoded_path.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run rscodec encode");
    assert!(status.success());

    let mut encoded = std::fs::read(&encoded_path).unwrap();
    assert_eq!(encoded.len(), 60); // 3 rows * n=20
    encoded[5] ^= 0x40; // corrupt one byte in the first row

    let status = bin()
        .args([
            "decode",
            "--n",
            "20",
            "--k",
            "12",
            encoded_path.to_str().unwrap(),
            decoded_path.to_str().unwrap(),
        ])
        .status()
        .expect("failed to run rscodec decode");
    assert!(status.success());

    let decoded = std::fs::read(&decoded_path).unwrap();
    assert_eq!(decoded, payload);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn probe_reports_primitive_polynomial() {
    let output = bin()
        .args(["probe", "--symsize", "8", "--gfpoly", "0x187"])
        .output()
        .expect("failed to run rscodec probe");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("primitive"));
}

#[test]
fn probe_rejects_non_primitive_polynomial() {
    let status = bin()
        .args(["probe", "--symsize", "8", "--gfpoly", "0xff"])
        .status()
        .expect("failed to run rscodec probe");
    assert!(!status.success());
}

fn tempdir() -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("rscodec-cli-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
