// End to end runs over a fixed lookup table: read a CSV, resolve, write the
// results and discards the way the binary does.

use roundtrip::{
    write_discards, write_table, Input, OutputFormat, Processor, Resolver, RoundtripError,
    Silent, StaticLookup,
};
use std::fs;

fn lookup() -> StaticLookup {
    StaticLookup::new()
        .host("example.com", &["192.0.2.5"])
        .addr("192.0.2.5", &["example.com."])
}

fn input(text: &str) -> Input {
    Input::from_reader(text.as_bytes(), "test".to_string()).expect("valid csv")
}

#[tokio::test]
async fn resolves_hosts_and_addresses_and_discards_garbage() {
    let input = input("id,host\n1,example.com\n2,192.0.2.5\n3,bad host\n");
    let column = input.column("host").unwrap();
    let processor = Processor::new(Resolver::new(lookup()));
    let report = processor.run(input, column, &mut Silent).await;

    assert_eq!(
        report.header,
        [
            "id",
            "host",
            "ips_from_forward_dns",
            "hostnames_from_reverse_dns",
            "roundtrip_ok"
        ]
    );
    assert_eq!(
        report.rows,
        vec![
            vec!["1", "example.com", "192.0.2.5", "example.com", "yes"],
            vec!["2", "192.0.2.5", "192.0.2.5", "example.com", "yes"],
        ]
    );
    assert_eq!(report.discards.len(), 1);
    assert_eq!(report.discards[0], ["3", "bad host"]);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    let discards = dir.path().join("discards.csv");
    write_table(
        fs::File::create(&out).unwrap(),
        OutputFormat::Csv,
        &report.header,
        &report.rows,
    )
    .unwrap();
    write_discards(&discards, &report.input_header, &report.discards).unwrap();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "id,host,ips_from_forward_dns,hostnames_from_reverse_dns,roundtrip_ok\n\
         1,example.com,192.0.2.5,example.com,yes\n\
         2,192.0.2.5,192.0.2.5,example.com,yes\n"
    );
    assert_eq!(
        fs::read_to_string(&discards).unwrap(),
        "id,host\n3,bad host\n"
    );
}

#[tokio::test]
async fn existing_derived_column_is_renamed() {
    let input = input("host,roundtrip_ok\nexample.com,maybe\n");
    let processor = Processor::new(Resolver::new(lookup()));
    let report = processor.run(input, 0, &mut Silent).await;
    assert_eq!(report.header[4], "roundtrip_ok_1");
    assert_eq!(
        report.rows[0],
        ["example.com", "maybe", "192.0.2.5", "example.com", "yes"]
    );
}

#[tokio::test]
async fn multi_address_results_are_space_joined() {
    let lookup = StaticLookup::new()
        .host("www.example.com", &["192.0.2.7", "192.0.2.10", "192.0.2.7"])
        .addr("192.0.2.7", &["www.example.com."])
        .addr("192.0.2.10", &["cdn.example.net.", "WWW.example.com"]);
    let processor = Processor::new(Resolver::new(lookup));
    let report = processor
        .run(input("host\nwww.example.com\n"), 0, &mut Silent)
        .await;
    assert_eq!(
        report.rows[0],
        [
            "www.example.com",
            "192.0.2.10 192.0.2.7",
            "cdn.example.net www.example.com",
            "yes"
        ]
    );
}

#[tokio::test]
async fn json_output_is_keyed_by_header() {
    let processor = Processor::new(Resolver::new(lookup()));
    let report = processor
        .run(input("host\nexample.com\n"), 0, &mut Silent)
        .await;
    let mut buf = Vec::new();
    write_table(&mut buf, OutputFormat::Json, &report.header, &report.rows).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "host": "example.com",
            "ips_from_forward_dns": "192.0.2.5",
            "hostnames_from_reverse_dns": "example.com",
            "roundtrip_ok": "yes",
        }])
    );
}

#[test]
fn ragged_input_fails_before_any_lookup() {
    let err = Input::from_reader(
        "id,host\n1,example.com\n2,192.0.2.5,extra\n".as_bytes(),
        "test".to_string(),
    )
    .unwrap_err();
    assert!(matches!(err, RoundtripError::RowLength { line: 3, .. }));
}

#[test]
fn input_file_is_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hosts.csv");
    fs::write(&path, "host\nexample.com\n").unwrap();
    let input = Input::open(Some(path.as_path())).unwrap();
    assert_eq!(input.source(), path.display().to_string());
    assert_eq!(input.records().len(), 1);
}
