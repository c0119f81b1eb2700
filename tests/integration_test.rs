mod common;

use anyhow::Result;
use common::{MarchLedger, add, test_service};
use expense_ledger::application::ErrorKind;
use serde_json::json;

#[tokio::test]
async fn test_add_returns_increasing_ids() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let mut previous = 0;
    for day in 1..=5 {
        let id = add(&service, &format!("2024-03-0{}", day), 10.0, "Other").await;
        assert!(id > previous, "id {} should follow {}", id, previous);
        previous = id;
    }

    Ok(())
}

#[tokio::test]
async fn test_add_stores_optional_fields() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_expense(
            "2024-03-02",
            18.75,
            "Food & Dining",
            Some("Groceries"),
            Some("farmers market"),
        )
        .await
        .success()
        .unwrap();
    add(&service, "2024-03-03", 4.0, "Food & Dining").await;

    let list = service
        .list_expenses("2024-03-01", "2024-03-31")
        .await
        .success()
        .unwrap();
    assert_eq!(list.records[1].subcategory, "Groceries");
    assert_eq!(list.records[1].note, "farmers market");
    assert_eq!(list.records[0].subcategory, "");
    assert_eq!(list.records[0].note, "");

    Ok(())
}

#[tokio::test]
async fn test_add_accepts_negative_amounts() -> Result<()> {
    let (service, _temp) = test_service().await?;

    add(&service, "2024-03-01", 50.0, "Shopping").await;
    add(&service, "2024-03-02", -20.0, "Shopping").await;

    let summary = service
        .summarize_expenses("2024-03-01", "2024-03-31", None)
        .await
        .success()
        .unwrap();
    assert_eq!(summary.summary[0].total_amount, 30.0);
    assert_eq!(summary.summary[0].count, 2);

    Ok(())
}

#[tokio::test]
async fn test_add_rejects_invalid_input() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let cases = [
        ("2024-3-1", 10.0, "Other"),
        ("not a date", 10.0, "Other"),
        ("", 10.0, "Other"),
        ("2024-02-30", 10.0, "Other"),
        ("2024-03-01", f64::NAN, "Other"),
        ("2024-03-01", f64::INFINITY, "Other"),
        ("2024-03-01", 10.0, "   "),
    ];

    for (date, amount, category) in cases {
        let envelope = service.add_expense(date, amount, category, None, None).await;
        let err = envelope.error().expect("should be rejected");
        assert_eq!(err.kind, ErrorKind::Validation, "{:?}", (date, amount, category));
    }

    let list = service
        .list_expenses("1900-01-01", "2999-12-31")
        .await
        .success()
        .unwrap();
    assert_eq!(list.count, 0);

    Ok(())
}

#[tokio::test]
async fn test_category_is_free_text() -> Result<()> {
    let (service, _temp) = test_service().await?;

    add(&service, "2024-03-01", 3.5, "Coffee habit").await;

    let list = service
        .list_expenses("2024-03-01", "2024-03-01")
        .await
        .success()
        .unwrap();
    assert_eq!(list.records[0].category, "Coffee habit");

    Ok(())
}

#[tokio::test]
async fn test_list_example_order() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let (food, transport) = MarchLedger::create_basic(&service).await;
    assert_eq!((food, transport), (1, 2));

    let envelope = service.list_expenses("2024-03-01", "2024-03-31").await;
    let list = envelope.clone().success().unwrap();
    assert_eq!(list.count, 2);
    let ids: Vec<i64> = list.records.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 1]);

    assert_eq!(
        envelope.to_json(),
        json!({
            "status": "success",
            "count": 2,
            "records": [
                {"id": 2, "date": "2024-03-05", "amount": 15.0, "category": "Transportation", "subcategory": "", "note": ""},
                {"id": 1, "date": "2024-03-01", "amount": 42.5, "category": "Food & Dining", "subcategory": "", "note": ""}
            ]
        })
    );

    Ok(())
}

#[tokio::test]
async fn test_list_range_is_inclusive_and_ordered() -> Result<()> {
    let (service, _temp) = test_service().await?;
    MarchLedger::create_extended(&service).await;

    let list = service
        .list_expenses("2024-03-01", "2024-03-31")
        .await
        .success()
        .unwrap();

    assert_eq!(list.count, 5);
    assert_eq!(list.count, list.records.len());
    assert!(list
        .records
        .iter()
        .all(|e| e.date.as_str() >= "2024-03-01" && e.date.as_str() <= "2024-03-31"));

    let keys: Vec<(String, i64)> = list.records.iter().map(|e| (e.date.clone(), e.id)).collect();
    assert_eq!(
        keys,
        vec![
            ("2024-03-31".to_string(), 5),
            ("2024-03-20".to_string(), 4),
            ("2024-03-05".to_string(), 3),
            ("2024-03-05".to_string(), 2),
            ("2024-03-01".to_string(), 1),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_list_is_stable_across_calls() -> Result<()> {
    let (service, _temp) = test_service().await?;
    for _ in 0..4 {
        add(&service, "2024-03-10", 1.0, "Other").await;
    }

    let first = service.list_expenses("2024-03-01", "2024-03-31").await;
    let second = service.list_expenses("2024-03-01", "2024-03-31").await;
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
async fn test_list_empty_range_is_not_an_error() -> Result<()> {
    let (service, _temp) = test_service().await?;
    MarchLedger::create_basic(&service).await;

    let list = service
        .list_expenses("2023-01-01", "2023-12-31")
        .await
        .success()
        .unwrap();
    assert_eq!(list.count, 0);
    assert!(list.records.is_empty());

    // Reversed bounds select nothing
    let list = service
        .list_expenses("2024-03-31", "2024-03-01")
        .await
        .success()
        .unwrap();
    assert_eq!(list.count, 0);

    Ok(())
}

#[tokio::test]
async fn test_list_rejects_malformed_bounds() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let envelope = service.list_expenses("March", "2024-03-31").await;
    let err = envelope.error().unwrap();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("start_date"));

    Ok(())
}

#[tokio::test]
async fn test_delete_then_list() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let (food, _) = MarchLedger::create_basic(&service).await;

    let deleted = service.delete_expense(food).await;
    assert_eq!(
        deleted.to_json(),
        json!({"status": "success", "message": "Expense 1 deleted"})
    );

    let list = service
        .list_expenses("2024-03-01", "2024-03-31")
        .await
        .success()
        .unwrap();
    assert!(list.records.iter().all(|e| e.id != food));
    assert_eq!(list.count, 1);

    let again = service.delete_expense(food).await;
    let err = again.error().unwrap();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(err.message, "Expense 1 not found");

    Ok(())
}

#[tokio::test]
async fn test_delete_unknown_id() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let envelope = service.delete_expense(42).await;
    assert_eq!(
        envelope.to_json(),
        json!({"status": "error", "kind": "not_found", "message": "Expense 42 not found"})
    );

    Ok(())
}

#[tokio::test]
async fn test_ids_not_reused_after_delete() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let first = add(&service, "2024-03-01", 1.0, "Other").await;
    let second = add(&service, "2024-03-01", 2.0, "Other").await;
    service.delete_expense(second).await.success().unwrap();
    service.delete_expense(first).await.success().unwrap();

    let third = add(&service, "2024-03-01", 3.0, "Other").await;
    assert!(third > second);

    Ok(())
}

#[tokio::test]
async fn test_get_categories_default() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let text = service.get_categories();
    let doc: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(
        doc,
        json!({"categories": [
            "Food & Dining",
            "Transportation",
            "Shopping",
            "Entertainment",
            "Bills & Utilities",
            "Healthcare",
            "Travel",
            "Education",
            "Business",
            "Other"
        ]})
    );
    assert!(text.contains("\n  "), "should be indented");

    Ok(())
}
