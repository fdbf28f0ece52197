//! Integration tests for the allowance engine.
//!
//! This test suite covers:
//! - Inbound and outbound allowance endpoints
//! - Fee-sheet batches with duplicates and unresolved rows
//! - Roster reconciliation including abnormal employees
//! - Budget balances
//! - CSV export flowing from reconciliation into the fee batch
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use allowance_engine::api::{AppState, create_router};
use allowance_engine::calculation::{RosterSources, reconcile_rosters, run_allowance_batch};
use allowance_engine::config::{AllowanceSettings, ConfigLoader};
use allowance_engine::models::{OrgLevel, RowStatus, WarningCode};
use allowance_engine::roster;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/engine.yaml").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal serialized as string")).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn employee(id: &str, hire: &str) -> Value {
    json!({
        "employee_id": id,
        "name": format!("name-{}", id),
        "org_path": {"level_1": "G", "level_2": "R", "level_3": "North", "level_4": "Sales"},
        "hire_date": hire
    })
}

fn transfer(id: &str, date: &str, from_level_3: &str, to_level_3: &str) -> Value {
    json!({
        "employee_id": id,
        "name": format!("log-{}", id),
        "hire_date": "2018-01-01",
        "transfer_date": date,
        "before": {"level_1": "G", "level_2": "R", "level_3": from_level_3, "level_4": "Sales"},
        "after": {"level_1": "G", "level_2": "R", "level_3": to_level_3, "level_4": "Sales"}
    })
}

// =============================================================================
// Single-employee allowances
// =============================================================================

#[tokio::test]
async fn test_inbound_literal_cases() {
    let cases = [
        ("2013-11-21", 2014, "12", "600"),
        ("2013-02-21", 2013, "10.5", "525"),
        ("2013-02-10", 2013, "11", "550"),
        ("2015-01-01", 2013, "0", "0"),
    ];

    for (join, year, months, amount) in cases {
        let (status, body) = post(
            create_router_for_test(),
            "/allowance/inbound",
            json!({"join_date": join, "target_year": year}),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "join {}", join);
        assert_eq!(decimal(&body["months"]), dec(months), "join {}", join);
        assert_eq!(decimal(&body["amount"]), dec(amount), "join {}", join);
    }
}

#[tokio::test]
async fn test_outbound_literal_cases() {
    let cases = [
        ("2023-01-01", "2024-03-01", 2024, "2.5", "125"),
        ("2024-02-01", "2024-05-16", 2024, "4", "200"),
        ("2023-01-01", "2024-03-01", 2023, "12", "600"),
    ];

    for (join, leave, year, months, amount) in cases {
        let (status, body) = post(
            create_router_for_test(),
            "/allowance/outbound",
            json!({"join_date": join, "leave_date": leave, "target_year": year}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(decimal(&body["months"]), dec(months), "{} -> {}", join, leave);
        assert_eq!(decimal(&body["amount"]), dec(amount), "{} -> {}", join, leave);
        assert_eq!(body["audit_step"]["rule_id"], "outbound_allowance");
    }
}

#[tokio::test]
async fn test_outbound_malformed_leave_date() {
    let (status, body) = post(
        create_router_for_test(),
        "/allowance/outbound",
        json!({"join_date": "2024-01-01", "leave_date": "soon", "target_year": 2024}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_DATE");
}

#[tokio::test]
async fn test_target_year_required_without_configuration() {
    let router = create_router(AppState::default());
    let (status, body) = post(router, "/allowance/inbound", json!({"join_date": "2024-01-01"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_CONFIG");
}

// =============================================================================
// Fee-sheet batch
// =============================================================================

#[tokio::test]
async fn test_batch_routes_rows_and_flags_problems() {
    let mut resigned = employee("E3", "2024-01-01");
    resigned["leave_date"] = json!("2025-03-01");
    let mut unresolved = employee("E4", "2020-01-01");
    unresolved["leave_date"] = json!("2025-03-01");
    unresolved["transfer_in_date"] = json!("2025-02-01");

    let rows = vec![
        employee("E1", "2025-02-21"),
        employee("E2", "2020-01-01"),
        employee("E2", "2021-01-01"),
        resigned,
        unresolved,
    ];

    let (status, body) = post(
        create_router_for_test(),
        "/allowance/batch",
        json!({"target_year": 2025, "rows": rows}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let statuses: Vec<&str> = body["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| line["status"].as_str().unwrap())
        .collect();
    assert_eq!(
        statuses,
        vec![
            "inbound",
            "duplicate_employee_id",
            "duplicate_employee_id",
            "resigned",
            "unresolved"
        ]
    );

    // 10.5 + 2.5 months at 50.00
    assert_eq!(decimal(&body["summary"]["total_amount"]), dec("650"));
    assert_eq!(body["summary"]["computed_rows"], 2);
    assert_eq!(body["summary"]["duplicate_rows"], 2);
    assert_eq!(body["summary"]["unresolved_rows"], 1);

    let codes: Vec<&str> = body["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["code"].as_str().unwrap())
        .collect();
    assert_eq!(
        codes,
        vec!["duplicate_employee_id", "duplicate_employee_id", "unresolved_date_state"]
    );
}

#[tokio::test]
async fn test_batch_malformed_row_does_not_abort_batch() {
    let mut bad = employee("E2", "2020-01-01");
    bad["hire_date"] = json!("01/01/2020");

    let (status, body) = post(
        create_router_for_test(),
        "/allowance/batch",
        json!({"rows": [employee("E1", "2020-01-01"), bad]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let lines = body["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["employee_id"], "E1");
    assert_eq!(decimal(&lines[0]["amount"]), dec("600"));

    assert_eq!(body["summary"]["computed_rows"], 1);
    assert_eq!(body["summary"]["rejected_rows"], 1);
    assert_eq!(decimal(&body["summary"]["total_amount"]), dec("600"));

    let warning = &body["warnings"][0];
    assert_eq!(warning["code"], "rejected_row");
    assert_eq!(warning["employee_id"], "E2");
    assert_eq!(warning["row"], 1);
}

#[tokio::test]
async fn test_batch_keeps_free_text_transfer_label() {
    let mut annotated = employee("E1", "2020-01-01");
    annotated["cross_org_transfer"] = json!("moved twice, check");
    let mut legacy = employee("E2", "2020-01-01");
    legacy["cross_org_transfer"] = json!("跨3组织调转");

    let (status, body) = post(
        create_router_for_test(),
        "/allowance/batch",
        json!({"rows": [annotated, legacy]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines"][0]["cross_org_transfer"], "moved twice, check");
    assert_eq!(body["lines"][1]["cross_org_transfer"], "crosses-configured-level");
    assert_eq!(body["summary"]["rejected_rows"], 0);
}

// =============================================================================
// Roster reconciliation
// =============================================================================

#[tokio::test]
async fn test_reconcile_split_and_abnormal() {
    let mut resigned = employee("E2", "2019-01-01");
    resigned["leave_date"] = json!("2025-06-30");

    let request = json!({
        "active": [employee("E1", "2020-01-01")],
        "resigned": [resigned],
        "transfers": [
            transfer("E1", "2025-04-10", "North", "South"),
            transfer("X9", "2025-07-01", "North", "South"),
        ]
    });

    let (status, body) = post(create_router_for_test(), "/roster/reconcile", request).await;

    assert_eq!(status, StatusCode::OK);
    let periods = body["periods"].as_array().unwrap();
    assert_eq!(periods.len(), 3);

    assert_eq!(periods[0]["employee_id"], "E1");
    assert_eq!(periods[0]["org_path"]["level_3"], "North");
    assert_eq!(periods[0]["transfer_out_date"], "2025-04-10");
    assert_eq!(periods[0]["transfer_in_date"], Value::Null);
    assert_eq!(periods[0]["cross_org_transfer"], "crosses-configured-level");

    assert_eq!(periods[1]["org_path"]["level_3"], "South");
    assert_eq!(periods[1]["transfer_in_date"], "2025-04-10");

    assert_eq!(periods[2]["employee_id"], "E2");
    assert_eq!(periods[2]["leave_date"], "2025-06-30");
    assert_eq!(periods[2]["cross_org_transfer"], "");

    let abnormal = body["abnormal_periods"].as_array().unwrap();
    assert_eq!(abnormal.len(), 2);
    assert!(abnormal.iter().all(|p| p["employee_id"] == "X9"));
    assert_eq!(abnormal[0]["hire_date"], "2018-01-01");
}

#[tokio::test]
async fn test_reconcile_level_override_makes_transfer_internal() {
    let request = json!({
        "org_level": 2,
        "active": [employee("E1", "2020-01-01")],
        "transfers": [transfer("E1", "2025-04-10", "North", "South")]
    });

    let (status, body) = post(create_router_for_test(), "/roster/reconcile", request).await;

    assert_eq!(status, StatusCode::OK);
    let periods = body["periods"].as_array().unwrap();
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0]["cross_org_transfer"], "level-2-internal");
    assert_eq!(periods[0]["transfer_out_date"], Value::Null);
}

#[tokio::test]
async fn test_reconcile_rejects_invalid_level() {
    let (status, body) = post(
        create_router_for_test(),
        "/roster/reconcile",
        json!({"org_level": 9, "active": []}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_CONFIG");
}

// =============================================================================
// Budget
// =============================================================================

#[tokio::test]
async fn test_budget_balance_within_budget() {
    let (status, body) = post(
        create_router_for_test(),
        "/budget/balance",
        json!({"total": "6000", "used": ["525", "600"]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["balance"]), dec("4875"));
    assert_eq!(body["overspend"], Value::Null);
    assert_eq!(body["entries"][1]["id"], 1);
}

// =============================================================================
// CSV pipeline
// =============================================================================

#[test]
fn test_csv_reconcile_then_fee_batch() {
    let active = "姓名,工号,一级组织,二级组织,三级组织,四级组织,入职日期\n\
                  Lin,E1,G,R,North,Sales,2020-01-01\n\
                  Wu,E2,G,R,North,Sales,2025-02-21\n";
    let resigned = "工号,姓名,一级组织,二级组织,三级组织,部门,入职日期,最后工作日\n\
                    E3,Zhao,G,R,North,Ops,2024-01-01,2025-03-01\n";
    let transfers = "工号,姓名,入职日期,调动日期,调动前一级组织,调动前二级组织,调动前三级组织,调动前部门,调动后一级组织,调动后二级组织,调动后三级组织,调动后部门\n\
                     E1,Lin,2020-01-01,2025-04-10,G,R,North,Sales,G,R,South,Sales\n";

    let sources = RosterSources {
        active: roster::read_active_roster(active.as_bytes()).unwrap(),
        resigned: roster::read_resigned_roster(resigned.as_bytes()).unwrap(),
        transfers: roster::read_transfer_log(transfers.as_bytes()).unwrap(),
    };
    let result = reconcile_rosters(&sources, OrgLevel::try_from(3).unwrap()).unwrap();
    assert_eq!(result.periods.len(), 4);
    assert!(result.abnormal_periods.is_empty());

    // The North organization's fee sheet holds every period still placed in North.
    let north: Vec<_> = result
        .periods
        .iter()
        .filter(|p| p.org_path.level_3 == "North")
        .collect();
    let mut exported = Vec::new();
    roster::write_periods(north, &mut exported).unwrap();

    let sheet = roster::read_fee_sheet(exported.as_slice()).unwrap();
    assert!(sheet.rejected.is_empty());
    assert_eq!(sheet.records.len(), 3);

    let batch = run_allowance_batch(&sheet.records, 2025, &AllowanceSettings::default());
    let statuses: Vec<RowStatus> = batch.lines.iter().map(|l| l.status).collect();
    assert_eq!(
        statuses,
        vec![RowStatus::TransferredOut, RowStatus::Inbound, RowStatus::Resigned]
    );
    // 3.5 (E1 until Apr 10) + 10.5 (E2) + 2.5 (E3)
    assert_eq!(batch.summary.total_amount, dec("825"));

    let mut fee_csv = Vec::new();
    roster::write_fee_lines(&batch.lines, &mut fee_csv).unwrap();
    let text = String::from_utf8(fee_csv).unwrap();
    assert!(text.lines().nth(1).unwrap().ends_with(",3.5,175.00,transferred_out"));
}

#[test]
fn test_csv_fee_sheet_rejected_rows_do_not_abort() {
    let sheet = "employee_id,hire_date\nE1,2020-01-01\nE2,2020-13-01\nE3,2025-06-16\n";

    let sheet = roster::read_fee_sheet(sheet.as_bytes()).unwrap();
    let batch = run_allowance_batch(&sheet.records, 2025, &AllowanceSettings::default())
        .with_rejected(sheet.rejected);

    assert_eq!(batch.lines.len(), 2);
    assert_eq!(batch.summary.rejected_rows, 1);
    assert_eq!(batch.warnings[0].code, WarningCode::RejectedRow);
    assert_eq!(batch.warnings[0].line, Some(3));
    // 12 + 6.5 months
    assert_eq!(batch.summary.total_amount, dec("925"));
}
