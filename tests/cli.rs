use assert_cmd::Command;
use predicates::prelude::*;

const TOTP_URI: &str = "otpauth://totp/ACME%20Co:john@example.com?secret=HXDMVJECJJWSRB3HWIZR4IFUGFTMXBOZ&issuer=ACME%20Co&algorithm=SHA1&digits=6&period=30";

fn pentry() -> Command {
    Command::cargo_bin("pentry").unwrap()
}

#[test]
fn show_prints_parsed_fields() {
    pentry()
        .arg("show")
        .write_stdin("hunter2\nlogin: john\nnotes follow\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Password: hunter2"))
        .stdout(predicate::str::contains("Username: john"))
        .stdout(predicate::str::contains("OTP:      not set"));
}

#[test]
fn show_password_only() {
    pentry()
        .arg("show")
        .arg("--password-only")
        .write_stdin("hunter2\nlogin: john\n")
        .assert()
        .success()
        .stdout("hunter2\n");
}

#[test]
fn show_json_output() {
    let output = pentry()
        .arg("show")
        .arg("--json")
        .write_stdin(format!("hunter2\n{TOTP_URI}\n"))
        .output()
        .expect("failed to run pentry show --json");

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["password"], "hunter2");
    assert_eq!(parsed["otp"]["secret"], "HXDMVJECJJWSRB3HWIZR4IFUGFTMXBOZ");
    assert_eq!(parsed["otp"]["digits"], 6);
}

#[test]
fn otp_code_at_fixed_time() {
    // 8640 s / 30 s = step 288, the reference vector.
    pentry()
        .arg("otp")
        .arg("--at")
        .arg("8640")
        .write_stdin(format!("hunter2\n{TOTP_URI}\n"))
        .assert()
        .success()
        .stdout("545293\n");
}

#[test]
fn otp_from_bare_totp_field() {
    pentry()
        .arg("otp")
        .arg("--at")
        .arg("8640")
        .write_stdin("hunter2\ntotp: HXDMVJECJJWSRB3HWIZR4IFUGFTMXBOZ\n")
        .assert()
        .success()
        .stdout("545293\n");
}

#[test]
fn otp_fails_without_configuration() {
    pentry()
        .arg("otp")
        .write_stdin("hunter2\njust some notes\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No OTP configured"));
}

#[test]
fn otp_fails_on_bad_secret() {
    pentry()
        .arg("otp")
        .write_stdin("hunter2\ntotp: not-valid-base32!!!\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base32"));
}
