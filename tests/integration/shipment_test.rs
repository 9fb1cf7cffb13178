//! Shipment lifecycle scenarios against a live database.

use clearport_entity::shipment::ShipmentStatus;
use clearport_entity::user::UserRole;

use crate::helpers::{TestApp, ctx};

#[tokio::test]
async fn accept_without_note_adds_no_audit_and_notifies_importer() {
    let Some(app) = TestApp::new().await else {
        return;
    };
    let importer = app.create_user("importer").await;
    let agent = app.create_user("agent").await;
    let shipment_id = app.create_shipment(importer, agent, "ASSIGNED", false).await;

    let updated = app
        .shipments
        .accept(&ctx(agent, UserRole::Agent), shipment_id, None)
        .await
        .expect("accept");

    assert_eq!(updated.status, ShipmentStatus::Confirmed);
    assert!(updated.is_accepted);
    assert_eq!(app.audit_count(shipment_id).await, 0);

    let notifications = app.notifications_for_entity(shipment_id).await;
    assert_eq!(notifications.len(), 1);
    let (recipient, title, entity_type) = &notifications[0];
    assert_eq!(*recipient, importer);
    assert_eq!(title, "Shipment Accepted");
    assert_eq!(entity_type, "SHIPMENT");
}

#[tokio::test]
async fn accept_with_note_appends_one_audit_entry() {
    let Some(app) = TestApp::new().await else {
        return;
    };
    let importer = app.create_user("importer").await;
    let agent = app.create_user("agent").await;
    let shipment_id = app.create_shipment(importer, agent, "ASSIGNED", false).await;

    app.shipments
        .accept(
            &ctx(agent, UserRole::Agent),
            shipment_id,
            Some("Docs look complete".to_string()),
        )
        .await
        .expect("accept");

    let messages: Vec<String> =
        sqlx::query_scalar("SELECT message FROM shipment_updates WHERE shipment_id = $1")
            .bind(shipment_id)
            .fetch_all(&app.db_pool)
            .await
            .expect("audit messages");
    assert_eq!(messages, vec!["Docs look complete".to_string()]);
}

#[tokio::test]
async fn complete_before_accept_is_rejected_without_side_effects() {
    let Some(app) = TestApp::new().await else {
        return;
    };
    let importer = app.create_user("importer").await;
    let agent = app.create_user("agent").await;
    let shipment_id = app.create_shipment(importer, agent, "ASSIGNED", false).await;

    let err = app
        .shipments
        .complete(&ctx(agent, UserRole::Agent), shipment_id, None)
        .await
        .expect_err("complete before accept");
    assert_eq!(err.kind, clearport_core::error::ErrorKind::Conflict);

    assert_eq!(app.audit_count(shipment_id).await, 0);
    assert!(app.notifications_for_entity(shipment_id).await.is_empty());
}
