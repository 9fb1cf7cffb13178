//! Payment lifecycle scenarios against a live database.

use clearport_core::error::ErrorKind;
use clearport_entity::payment::PaymentStatus;
use clearport_entity::user::UserRole;

use crate::helpers::{TestApp, ctx, test_document};

#[tokio::test]
async fn completion_appends_audit_entry_with_formatted_amount() {
    let Some(app) = TestApp::new().await else {
        return;
    };
    let importer = app.create_user("importer").await;
    let agent = app.create_user("agent").await;
    let shipment_id = app.create_shipment(importer, agent, "CONFIRMED", true).await;
    let payment_id = app
        .create_payment(shipment_id, agent, importer, 123_456, "REQUESTED")
        .await;

    let payment = app
        .payments
        .complete(
            &ctx(agent, UserRole::Agent),
            payment_id,
            test_document("receipt.pdf"),
        )
        .await
        .expect("complete");

    assert_eq!(payment.status, PaymentStatus::Completed);
    assert!(payment.receipt_url.is_some());

    let messages: Vec<String> =
        sqlx::query_scalar("SELECT message FROM shipment_updates WHERE shipment_id = $1")
            .bind(shipment_id)
            .fetch_all(&app.db_pool)
            .await
            .expect("audit messages");
    assert_eq!(messages.len(), 1);
    assert!(
        messages[0].contains("SAR 1,234.56"),
        "audit entry missing formatted amount: {}",
        messages[0]
    );

    let notifications = app.notifications_for_entity(payment_id).await;
    assert_eq!(notifications.len(), 1);
    let (recipient, title, entity_type) = &notifications[0];
    assert_eq!(*recipient, importer);
    assert_eq!(title, "Payment Completed");
    assert_eq!(entity_type, "PAYMENT");
}

#[tokio::test]
async fn delete_of_confirmed_payment_leaves_row_untouched() {
    let Some(app) = TestApp::new().await else {
        return;
    };
    let importer = app.create_user("importer").await;
    let agent = app.create_user("agent").await;
    let shipment_id = app.create_shipment(importer, agent, "CONFIRMED", true).await;
    let payment_id = app
        .create_payment(shipment_id, agent, importer, 50_000, "CONFIRMED")
        .await;

    let err = app
        .payments
        .delete(&ctx(agent, UserRole::Agent), payment_id)
        .await
        .expect_err("delete must fail");
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert!(err.message.contains("CONFIRMED"));

    let (status, amount, receipt_url): (String, i64, Option<String>) = sqlx::query_as(
        "SELECT status::text, amount_minor, receipt_url FROM payments WHERE id = $1",
    )
    .bind(payment_id)
    .fetch_one(&app.db_pool)
    .await
    .expect("payment row still present");
    assert_eq!(status, "CONFIRMED");
    assert_eq!(amount, 50_000);
    assert!(receipt_url.is_none());

    assert!(app.notifications_for_entity(payment_id).await.is_empty());
}
