//! Payment use cases.
//!
//! Like shipment transitions, payment transitions lock the payment row,
//! apply the status change, persist the counterparty's notification in
//! the same transaction, and push on the bus only after the commit.
//! Completion additionally appends a shipment audit entry carrying the
//! formatted amount.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use clearport_core::error::{AppError, ErrorKind};
use clearport_core::result::AppResult;
use clearport_core::types::pagination::{PageRequest, PageResponse};
use clearport_database::repositories::payment::PaymentRepository;
use clearport_database::repositories::shipment::ShipmentRepository;
use clearport_database::repositories::shipment_update::ShipmentUpdateRepository;
use clearport_entity::notification::{NewNotification, NotificationEntityType};
use clearport_entity::payment::{Payment, PaymentStatus};
use clearport_storage::DocumentStore;

use crate::context::RequestContext;
use crate::document::DocumentUpload;
use crate::money::format_currency;
use crate::notification::NotificationService;
use crate::payment::machine::PaymentMachine;

/// Input for raising a payment request.
#[derive(Debug, Clone)]
pub struct CreatePayment {
    /// The shipment this payment belongs to.
    pub shipment_id: Uuid,
    /// Amount in minor currency units.
    pub amount_minor: i64,
    /// What the payment covers.
    pub description: Option<String>,
    /// Customs bill number.
    pub bill_number: Option<String>,
    /// Customs declaration (bayan) number.
    pub bayan_number: Option<String>,
    /// Date by which the payment is due.
    pub payment_deadline: Option<NaiveDate>,
    /// Kind of payment (customs duty, port fees, ...).
    pub payment_type: Option<String>,
    /// Invoice document, stored before the row is written.
    pub invoice: Option<DocumentUpload>,
}

/// Manages payment requests and their lifecycle.
#[derive(Debug, Clone)]
pub struct PaymentService {
    pool: PgPool,
    payments: Arc<PaymentRepository>,
    shipments: Arc<ShipmentRepository>,
    audit: Arc<ShipmentUpdateRepository>,
    notifier: Arc<NotificationService>,
    store: Arc<dyn DocumentStore>,
    machine: PaymentMachine,
    currency: String,
}

impl PaymentService {
    /// Creates a new payment service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        payments: Arc<PaymentRepository>,
        shipments: Arc<ShipmentRepository>,
        audit: Arc<ShipmentUpdateRepository>,
        notifier: Arc<NotificationService>,
        store: Arc<dyn DocumentStore>,
        machine: PaymentMachine,
        currency: String,
    ) -> Self {
        Self {
            pool,
            payments,
            shipments,
            audit,
            notifier,
            store,
            machine,
            currency,
        }
    }

    /// The assigned agent raises a payment request against a shipment.
    pub async fn create(&self, ctx: &RequestContext, input: CreatePayment) -> AppResult<Payment> {
        if input.amount_minor <= 0 {
            return Err(AppError::validation("Payment amount must be positive"));
        }
        let shipment = self
            .shipments
            .find_by_id(input.shipment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment not found"))?;
        if ctx.user_id != shipment.agent_id {
            return Err(AppError::forbidden(
                "Only the assigned agent can request a payment",
            ));
        }

        let id = Uuid::new_v4();
        let invoice_url = match &input.invoice {
            Some(doc) => Some(
                self.store
                    .put(
                        &format!("payments/{id}/{}", doc.safe_file_name()),
                        doc.data.clone(),
                        &doc.content_type,
                    )
                    .await?,
            ),
            None => None,
        };

        let now = Utc::now();
        let payment = Payment {
            id,
            shipment_id: shipment.id,
            agent_id: shipment.agent_id,
            importer_id: shipment.importer_id,
            amount_minor: input.amount_minor,
            description: input.description,
            bill_number: input.bill_number,
            bayan_number: input.bayan_number,
            payment_deadline: input.payment_deadline,
            payment_type: input.payment_type,
            status: PaymentStatus::Requested,
            invoice_url,
            receipt_url: None,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.begin().await?;
        let payment = self.payments.create_in(&mut tx, &payment).await?;
        let notification = self
            .notifier
            .record_in(
                &mut tx,
                &NewNotification {
                    recipient_id: shipment.importer_id,
                    sender_id: ctx.user_id,
                    title: "New Payment Request".to_string(),
                    message: format!(
                        "Payment of {} requested for shipment {}",
                        format_currency(payment.amount_minor, &self.currency),
                        shipment.reference
                    ),
                    entity_type: NotificationEntityType::Payment,
                    entity_id: id,
                    shipment_id: Some(shipment.id),
                },
            )
            .await?;
        self.commit(tx).await?;
        self.notifier.publish(&notification);

        info!(payment_id = %id, shipment_id = %shipment.id, "Payment requested");
        Ok(payment)
    }

    /// Fetches a payment the current user may see.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Payment> {
        let payment = self
            .payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Payment not found"))?;
        self.authorize_party(ctx, &payment)?;
        Ok(payment)
    }

    /// Lists payments visible to the current user, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Payment>> {
        self.payments.list_for_user(ctx.user_id, page).await
    }

    /// Lists payments attached to a shipment the user is a party to.
    pub async fn list_for_shipment(
        &self,
        ctx: &RequestContext,
        shipment_id: Uuid,
    ) -> AppResult<Vec<Payment>> {
        let shipment = self
            .shipments
            .find_by_id(shipment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment not found"))?;
        if !ctx.is_admin()
            && ctx.user_id != shipment.importer_id
            && ctx.user_id != shipment.agent_id
        {
            return Err(AppError::forbidden("Not a party to this shipment"));
        }
        self.payments.list_for_shipment(shipment_id).await
    }

    /// The importer confirms a requested payment.
    pub async fn confirm(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Payment> {
        self.decide(ctx, id, Decision::Confirm).await
    }

    /// The importer rejects a requested payment.
    pub async fn reject(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Payment> {
        self.decide(ctx, id, Decision::Reject).await
    }

    /// The agent completes a payment by uploading the settlement document.
    ///
    /// Appends a `Payment Completed` entry with the formatted amount to
    /// the shipment's audit trail and notifies the importer.
    pub async fn complete(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        receipt: DocumentUpload,
    ) -> AppResult<Payment> {
        // Preflight before the upload so a forbidden or conflicting call
        // leaves no orphaned receipt behind.
        let preflight = self
            .payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Payment not found"))?;
        if !ctx.is_admin() && ctx.user_id != preflight.agent_id {
            return Err(AppError::forbidden(
                "Only the requesting agent can complete a payment",
            ));
        }
        self.machine.check_complete(preflight.status)?;

        let receipt_url = self
            .store
            .put(
                &format!("payments/{id}/receipts/{}", receipt.safe_file_name()),
                receipt.data.clone(),
                &receipt.content_type,
            )
            .await?;

        let mut tx = self.begin().await?;

        let payment = self
            .payments
            .find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Payment not found"))?;
        self.machine.check_complete(payment.status)?;

        let payment = self.payments.complete_in(&mut tx, id, &receipt_url).await?;

        let amount = format_currency(payment.amount_minor, &self.currency);
        let audit_message = match &payment.description {
            Some(desc) => format!("Payment Completed: {amount} ({desc})"),
            None => format!("Payment Completed: {amount}"),
        };
        self.audit
            .append_in(
                &mut tx,
                payment.shipment_id,
                &audit_message,
                Some(&receipt_url),
                ctx.user_id,
            )
            .await?;

        let notification = self
            .notifier
            .record_in(
                &mut tx,
                &NewNotification {
                    recipient_id: payment.importer_id,
                    sender_id: ctx.user_id,
                    title: "Payment Completed".to_string(),
                    message: format!("A payment of {amount} was completed"),
                    entity_type: NotificationEntityType::Payment,
                    entity_id: id,
                    shipment_id: Some(payment.shipment_id),
                },
            )
            .await?;

        self.commit(tx).await?;
        self.notifier.publish(&notification);

        info!(payment_id = %id, agent_id = %ctx.user_id, "Payment completed");
        Ok(payment)
    }

    /// The requesting agent deletes a payment that is still in `Requested`.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let mut tx = self.begin().await?;

        let payment = self
            .payments
            .find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Payment not found"))?;
        if ctx.user_id != payment.agent_id {
            return Err(AppError::forbidden(
                "Only the requesting agent can delete a payment",
            ));
        }
        self.machine.check_delete(payment.status)?;

        self.payments.delete_in(&mut tx, id).await?;
        self.commit(tx).await?;

        info!(payment_id = %id, agent_id = %ctx.user_id, "Payment deleted");
        Ok(())
    }

    async fn decide(&self, ctx: &RequestContext, id: Uuid, decision: Decision) -> AppResult<Payment> {
        let mut tx = self.begin().await?;

        let payment = self
            .payments
            .find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Payment not found"))?;
        if ctx.user_id != payment.importer_id {
            return Err(AppError::forbidden(
                "Only the importer can decide on a payment",
            ));
        }

        let (next, title, verb) = match decision {
            Decision::Confirm => (
                self.machine.confirm(payment.status)?,
                "Payment Confirmed",
                "confirmed",
            ),
            Decision::Reject => (
                self.machine.reject(payment.status)?,
                "Payment Rejected",
                "rejected",
            ),
        };

        let payment = self.payments.set_status_in(&mut tx, id, next).await?;

        let notification = self
            .notifier
            .record_in(
                &mut tx,
                &NewNotification {
                    recipient_id: payment.agent_id,
                    sender_id: ctx.user_id,
                    title: title.to_string(),
                    message: format!(
                        "A payment of {} was {verb}",
                        format_currency(payment.amount_minor, &self.currency)
                    ),
                    entity_type: NotificationEntityType::Payment,
                    entity_id: id,
                    shipment_id: Some(payment.shipment_id),
                },
            )
            .await?;

        self.commit(tx).await?;
        self.notifier.publish(&notification);

        info!(payment_id = %id, status = %payment.status, "Payment decided");
        Ok(payment)
    }

    fn authorize_party(&self, ctx: &RequestContext, payment: &Payment) -> AppResult<()> {
        if ctx.is_admin() || ctx.user_id == payment.importer_id || ctx.user_id == payment.agent_id
        {
            Ok(())
        } else {
            Err(AppError::forbidden("Not a party to this payment"))
        }
    }

    async fn begin(&self) -> AppResult<sqlx::Transaction<'_, sqlx::Postgres>> {
        self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })
    }

    async fn commit(&self, tx: sqlx::Transaction<'_, sqlx::Postgres>) -> AppResult<()> {
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }
}

/// The importer's decision on a requested payment.
#[derive(Debug, Clone, Copy)]
enum Decision {
    Confirm,
    Reject,
}
