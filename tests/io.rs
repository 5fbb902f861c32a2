use std::fs;

use lcv::config::LcvConfig;
use lcv::io::{
    SummaryColumns, read_summary_vectors, write_lcv_json, write_likelihood, write_summary_vectors,
};
use lcv::simulate::{SimConfig, simulate_summary_vectors};
use lcv::run_lcv;
use tempfile::tempdir;

#[test]
fn tab_separated_table_with_missing_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pair.tsv");
    fs::write(
        &path,
        "SNP\tL2\tZ1\tZ2\nrs1\t2.0\t1.5\t-0.5\nrs2\t4.0\tNA\t0.1\nrs3\t0.5\t-1.0\t2.0\n",
    )
    .unwrap();
    let (data, dropped) = read_summary_vectors(&path, &SummaryColumns::default()).unwrap();
    assert_eq!(dropped, 1);
    assert_eq!(data.ell, vec![2.0, 0.5]);
    assert_eq!(data.z1, vec![1.5, -1.0]);
    assert_eq!(data.z2, vec![-0.5, 2.0]);
    assert_eq!(data.weights, vec![0.5, 1.0]);
}

#[test]
fn whitespace_table_with_weight_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pair.txt");
    fs::write(
        &path,
        "ldscore  za   zb  w\n1.0 0.2 0.3 0.9\n3.0  0.4 -0.1   0.3\n",
    )
    .unwrap();
    let columns = SummaryColumns {
        ell: "ldscore".to_string(),
        z1: "za".to_string(),
        z2: "zb".to_string(),
        weights: Some("w".to_string()),
    };
    let (data, dropped) = read_summary_vectors(&path, &columns).unwrap();
    assert_eq!(dropped, 0);
    assert_eq!(data.ell, vec![1.0, 3.0]);
    assert_eq!(data.weights, vec![0.9, 0.3]);
}

#[test]
fn missing_z_column_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pair.tsv");
    fs::write(&path, "L2\tZ1\n1.0\t0.5\n").unwrap();
    let err = read_summary_vectors(&path, &SummaryColumns::default()).unwrap_err();
    assert!(format!("{err:#}").contains("missing required column Z2"), "{err:#}");
}

#[test]
fn single_row_table_is_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("one.tsv");
    fs::write(&path, "L2\tZ1\tZ2\n3.0\t0.5\t-0.25\n").unwrap();
    let (data, dropped) = read_summary_vectors(&path, &SummaryColumns::default()).unwrap();
    assert_eq!(dropped, 0);
    assert_eq!(data.ell, vec![3.0]);
    assert_eq!(data.z1, vec![0.5]);
    assert_eq!(data.z2, vec![-0.25]);
}

#[test]
fn simulated_table_survives_gzip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sim.tsv.gz");
    let data = simulate_summary_vectors(&SimConfig {
        n_variants: 200,
        seed: 5,
        ..SimConfig::default()
    })
    .unwrap();
    write_summary_vectors(&data, &path, true).unwrap();
    let columns = SummaryColumns {
        weights: Some("WEIGHT".to_string()),
        ..SummaryColumns::default()
    };
    let (read, dropped) = read_summary_vectors(&path, &columns).unwrap();
    assert_eq!(dropped, 0);
    assert_eq!(read.len(), 200);
    for i in 0..200 {
        assert!((read.z1[i] - data.z1[i]).abs() < 1e-12);
        assert!((read.weights[i] - data.weights[i]).abs() < 1e-12);
    }
}

#[test]
fn results_are_written_as_json_and_curve() {
    let dir = tempdir().unwrap();
    let data = simulate_summary_vectors(&SimConfig {
        n_variants: 2_000,
        seed: 6,
        ..SimConfig::default()
    })
    .unwrap();
    let out = run_lcv(&data, &LcvConfig { no_blocks: 10, ..LcvConfig::default() }).unwrap();

    let json_path = dir.path().join("out.json");
    write_lcv_json(&out, &json_path).unwrap();
    let json = fs::read_to_string(&json_path).unwrap();
    assert!(json.starts_with("{\"zsc_gcp\":"));
    assert!(json.contains("\"pval_fullycausal\":["));
    assert!(json.contains("\"diagnostics\":["));

    let curve_path = dir.path().join("curve.tsv");
    write_likelihood(&out, &curve_path).unwrap();
    let curve = fs::read_to_string(&curve_path).unwrap();
    let lines: Vec<&str> = curve.lines().collect();
    assert_eq!(lines.len(), 202);
    assert!(lines[1].starts_with("-1.00\t"));
    assert!(lines[101].starts_with("0.00\t"));
    assert!(lines[201].starts_with("1.00\t"));
}
