#[cfg(feature = "cli_app")]
#[cfg(test)]
mod cli_tests {
    use assert_cmd::Command;
    use chrono::{Local, TimeZone};
    use predicates::prelude::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::process::Stdio;
    use std::time::Duration;
    use vertex_viewer::cli_app::{fit, format_point, render_report};
    use vertex_viewer::sheet::Spreadsheet;
    use vertex_viewer::zones::group_rows;
    use wait_timeout::ChildExt;

    fn data(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
    }

    #[test]
    fn test_fit_and_format_point() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("abcdefghij", 5), "abcd~");
        assert_eq!(format_point(&[1.0, -2.5, 0.0]), "(1, -2.5, 0)");
    }

    #[test]
    fn test_render_report_sections() {
        let sheet = Spreadsheet::from_csv_reader(
            "mem.csv",
            "Zone name,Data points\nA Vertex1,1 2 3\nA Vertex2,[4,5,6]\nA Vertex3,bad\nB Vertex1,0 0 0\n"
                .as_bytes(),
        )
        .unwrap();
        let report = group_rows(&sheet.rows);
        let when = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let text = render_report(&sheet, &report, when);

        assert!(text.starts_with("3D Vertex Visualizer for Camera Calibration\n"));
        assert!(text.contains("File uploaded successfully! mem.csv (4 rows, 3 valid points, 2024-05-01 09:30:00)"));
        assert!(text.contains("Zone: A\n  warning: Not enough valid vertices to visualize A (2 found, 3 needed)"));
        assert!(text.contains("Zone: B\n  warning: Not enough valid vertices to visualize B (1 found, 3 needed)"));
        assert!(text.contains("Invalid rows:"));
        assert!(text.contains("not a number: 'bad'"));
        assert!(!text.contains("edges:"));
    }

    #[test]
    fn test_cli_prints_zones() {
        Command::cargo_bin("vertex_viewer")
            .unwrap()
            .arg(data("calibration.csv"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Zone: Front\n  4 vertices, 4 edges"))
            .stdout(predicate::str::contains("edges: 1-2 2-3 3-4 4-1"))
            .stdout(predicate::str::contains("Zone: Door\n  3 vertices, 3 edges"))
            .stdout(predicate::str::contains("visualize Roof (2 found, 3 needed)"))
            .stdout(predicate::str::contains("1 row(s) without a '<name> Vertex' label skipped (rows 11)"));
    }

    #[test]
    fn test_cli_missing_column_single_error() {
        Command::cargo_bin("vertex_viewer")
            .unwrap()
            .arg(data("missing_points.csv"))
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("'Data points'"))
            .stderr(predicate::str::contains("Zone:").not());
    }

    #[test]
    fn test_cli_missing_file_reports_cause_once() {
        let path = data("nope.csv");
        let output = Command::cargo_bin("vertex_viewer").unwrap().arg(&path).output().unwrap();
        assert_eq!(output.status.code(), Some(1));

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert_eq!(
            stderr,
            format!(
                "Error: cannot read {}: No such file or directory (os error 2)\n",
                path.display()
            )
        );
    }

    #[test]
    fn test_cli_corrupt_workbook_single_line() {
        let output = Command::cargo_bin("vertex_viewer")
            .unwrap()
            .arg(data("corrupt.xlsx"))
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert_eq!(stderr.lines().count(), 1);
        assert_eq!(stderr.matches("cannot read workbook").count(), 1);
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_cli_reads_named_worksheet() {
        Command::cargo_bin("vertex_viewer")
            .unwrap()
            .arg(data("calibration.xlsx"))
            .arg("--sheet")
            .arg("Backup")
            .assert()
            .success()
            .stdout(predicate::str::contains("Zone: Back\n  3 vertices, 3 edges"))
            .stdout(predicate::str::contains("Zone: Front").not());

        Command::cargo_bin("vertex_viewer")
            .unwrap()
            .arg(data("calibration.xlsx"))
            .arg("--sheet")
            .arg("Nope")
            .assert()
            .code(1)
            .stderr("Error: worksheet 'Nope' not found\n");
    }

    #[test]
    fn test_cli_unsupported_extension() {
        Command::cargo_bin("vertex_viewer")
            .unwrap()
            .arg("points.txt")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unsupported file type"));
    }

    #[test]
    fn test_cli_exports_obj() {
        let out = std::env::temp_dir().join(format!("vertex_viewer_{}.obj", std::process::id()));
        Command::cargo_bin("vertex_viewer")
            .unwrap()
            .arg(data("calibration.csv"))
            .arg("--obj")
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("Wrote 2 wireframe(s)"));

        let obj = std::fs::read_to_string(&out).unwrap();
        let _ = std::fs::remove_file(&out);
        assert!(obj.contains("o Door\n"));
        assert!(obj.contains("o Front\n"));
        assert!(obj.contains("l 1 2 3 1\n"));
        assert!(obj.contains("l 4 5 6 7 4\n"));
    }

    #[test]
    fn test_cli_obj_without_renderable_zone_fails() {
        let out = std::env::temp_dir().join(format!("vertex_viewer_none_{}.obj", std::process::id()));
        Command::cargo_bin("vertex_viewer")
            .unwrap()
            .arg(data("scenario.csv"))
            .arg("--obj")
            .arg(&out)
            .assert()
            .failure()
            .stderr(predicate::str::contains("no zone has enough valid vertices"));
        assert!(!out.exists());
    }

    #[test]
    fn test_cli_reads_piped_stdin() {
        let bin = assert_cmd::cargo::cargo_bin("vertex_viewer");
        let mut child = std::process::Command::new(bin)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();

        {
            let stdin = child.stdin.as_mut().unwrap();
            stdin
                .write_all(b"Zone name,Data points\nT Vertex1,0 0 0\nT Vertex2,1 0 0\nT Vertex3,0 1 0\n")
                .unwrap();
        }
        drop(child.stdin.take());

        let status = match child.wait_timeout(Duration::from_secs(10)).unwrap() {
            Some(status) => status,
            None => {
                child.kill().unwrap();
                panic!("vertex_viewer did not finish reading stdin");
            }
        };
        assert!(status.success());

        let mut stdout = String::new();
        std::io::Read::read_to_string(child.stdout.as_mut().unwrap(), &mut stdout).unwrap();
        assert!(stdout.contains("<stdin> (3 rows"));
        assert!(stdout.contains("Zone: T\n  3 vertices, 3 edges"));
    }
}
