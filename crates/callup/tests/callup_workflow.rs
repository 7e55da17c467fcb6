use callup::admission::{
    allocate, resolve, AllocationRequest, CallUpService, Track, Verdict,
};
use callup::admission::report::{ReportData, ReportFormat, NOTE_REALLOCATED};
use callup::config::ReportConfig;
use callup::roster::RosterImporter;
use std::io::Cursor;

fn roster_csv() -> String {
    let mut csv = String::from("INSCRIÇÃO,NOME,SITUAÇÃO,CLAS. AMPLA,CLAS. COTAS,NOTA TOTAL\n");
    csv.push_str("9000,Already Called,CONVOCADO,1,\n");
    for rank in 1..=40u32 {
        let quota = if rank % 8 == 0 {
            (rank / 8).to_string()
        } else {
            String::new()
        };
        let name = if rank == 3 {
            "Helena Prado (Sub Judice)".to_string()
        } else {
            format!("Candidate {rank}")
        };
        csv.push_str(&format!("{},{},,{},{},\"{},5\"\n", 1000 + rank, name, rank, quota, 90 - rank));
    }
    csv
}

#[test]
fn shallow_roster_matches_documented_partial_fill() {
    let csv = "INSCRIÇÃO,NOME,CLAS. AMPLA,CLAS. COTAS\n1,Um,1,1\n2,Dois,2,\n3,Tres,3,\n";
    let import = RosterImporter::from_csv_reader(Cursor::new(csv)).expect("roster imports");

    let result = allocate(&import.pool, &AllocationRequest::new(5));

    assert_eq!(result.split.general, 4);
    assert_eq!(result.split.quota, 1);
    assert_eq!(result.seats.len(), 3);
    assert!(result.seats.iter().all(|seat| seat.track == Track::General));
    assert_eq!(result.unfilled_seats, 2);
}

#[test]
fn already_called_candidates_never_reenter() {
    let import =
        RosterImporter::from_csv_reader(Cursor::new(roster_csv())).expect("roster imports");
    assert_eq!(import.skipped_called, 1);

    let result = allocate(&import.pool, &AllocationRequest::new(40));
    assert!(result.seat_for("9000").is_none());
    assert!(matches!(
        resolve(&import.pool, &result, "9000"),
        Verdict::Unknown { .. }
    ));
}

#[test]
fn cutoff_verdicts_distinguish_unseated_from_unknown() {
    let import =
        RosterImporter::from_csv_reader(Cursor::new(roster_csv())).expect("roster imports");
    let result = allocate(&import.pool, &AllocationRequest::new(10));

    let seated = resolve(&import.pool, &result, "1008");
    let record = seated.outcome().expect("rank 8 is seated on merit");
    assert_eq!(record.track, Track::General);
    assert!(record.quota_eligible_on_general_merit);

    let quota = resolve(&import.pool, &result, " 1016 ");
    assert_eq!(quota.outcome().map(|r| r.track), Some(Track::Quota));
    assert_eq!(quota.outcome().and_then(|r| r.rank_used), Some(2));

    let below = resolve(&import.pool, &result, "1030");
    assert!(matches!(below, Verdict::NotSeated { .. }));

    let unknown = resolve(&import.pool, &result, "31337");
    assert!(matches!(unknown, Verdict::Unknown { .. }));
}

#[test]
fn service_runs_simulation_then_renders_cached_report() {
    let import =
        RosterImporter::from_csv_reader(Cursor::new(roster_csv())).expect("roster imports");
    let service =
        CallUpService::new(import.pool, &ReportConfig::default()).without_report_persistence();

    let outcome = service
        .run_simulation("1003", AllocationRequest::new(10).excluding_sub_judice())
        .expect("simulation runs");
    assert_eq!(outcome.verdict.kind(), "excluded_sub_judice");
    assert!(outcome.result.seat_for("1009").is_some());

    let document = service
        .fetch_report("1003", 10, ReportFormat::Html)
        .expect("report renders");
    let html = String::from_utf8(document.bytes).expect("utf-8 html");
    assert!(html.contains("Candidate 9"));
    assert!(!html.contains("Helena Prado"));
}

#[test]
fn report_projection_flags_reallocated_seats() {
    let csv = "INSCRIÇÃO,NOME,CLAS. AMPLA,CLAS. COTAS\n\
1,A,1,\n2,B,2,\n3,C,3,\n4,D,4,\n5,E,5,\n6,F,6,\n7,G,7,\n8,H,8,\n9,I,9,\n10,J,10,\n";
    let import = RosterImporter::from_csv_reader(Cursor::new(csv)).expect("roster imports");
    let result = allocate(&import.pool, &AllocationRequest::new(10));
    let report = ReportData::project(&result);

    assert_eq!(report.summary.reallocated, 2);
    assert_eq!(report.summary.general_total, 10);
    assert_eq!(report.summary.quota_total, 0);
    assert_eq!(report.rows[9].note, NOTE_REALLOCATED);
    assert_eq!(report.rows[9].track_label, Track::GeneralReallocated.label());
}
