//! Shipment use cases.
//!
//! Every transition runs inside one transaction: lock the row, resolve
//! the transition, apply it, append the audit entry, and persist the
//! notification for the other party. The live push happens strictly
//! after the commit so no event ever describes a rolled-back change.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use clearport_core::error::{AppError, ErrorKind};
use clearport_core::result::AppResult;
use clearport_core::types::pagination::{PageRequest, PageResponse};
use clearport_database::repositories::shipment::ShipmentRepository;
use clearport_database::repositories::shipment_update::ShipmentUpdateRepository;
use clearport_entity::notification::{NewNotification, NotificationEntityType};
use clearport_entity::shipment::{
    Shipment, ShipmentMode, ShipmentStatus, ShipmentTruck, ShipmentUpdate,
};
use clearport_entity::user::UserRole;
use clearport_storage::DocumentStore;

use crate::context::RequestContext;
use crate::document::DocumentUpload;
use crate::notification::NotificationService;
use crate::shipment::machine::ShipmentMachine;

/// Input for creating a shipment.
#[derive(Debug, Clone)]
pub struct CreateShipment {
    /// Transport mode.
    pub mode: ShipmentMode,
    /// Port or terminal of origin.
    pub origin_port: String,
    /// Destination port or terminal.
    pub destination_port: String,
    /// Estimated departure date.
    pub etd: Option<NaiveDate>,
    /// Estimated arrival date.
    pub eta: Option<NaiveDate>,
    /// Bill of lading / airway bill number.
    pub bill_of_lading_number: Option<String>,
    /// Customs declaration (bayan) number.
    pub bayan_number: Option<String>,
    /// The user on the other side of the shipment: the agent when an
    /// importer creates it, the importer when an agent does.
    pub counterparty_id: Uuid,
    /// Estimated clearance charges in minor currency units.
    pub clearance_charges_minor: i64,
    /// Primary shipping document, stored before the row is written.
    pub document: Option<DocumentUpload>,
    /// Trucks for land shipments.
    pub trucks: Vec<TruckInput>,
}

/// A truck entry supplied at creation time.
#[derive(Debug, Clone)]
pub struct TruckInput {
    /// Plate number.
    pub truck_number: String,
    /// Driver name.
    pub driver_name: Option<String>,
    /// Driver contact number.
    pub driver_phone: Option<String>,
}

/// A tracking update: a new status, a note, a document, or any mix.
#[derive(Debug, Clone, Default)]
pub struct ShipmentChange {
    /// New tracking status, if the status is changing.
    pub status: Option<ShipmentStatus>,
    /// Free-form note for the audit trail.
    pub note: Option<String>,
    /// Supporting document.
    pub document: Option<DocumentUpload>,
}

/// Manages shipments and their lifecycle transitions.
#[derive(Debug, Clone)]
pub struct ShipmentService {
    pool: PgPool,
    shipments: Arc<ShipmentRepository>,
    updates: Arc<ShipmentUpdateRepository>,
    notifier: Arc<NotificationService>,
    store: Arc<dyn DocumentStore>,
    machine: ShipmentMachine,
}

impl ShipmentService {
    /// Creates a new shipment service.
    pub fn new(
        pool: PgPool,
        shipments: Arc<ShipmentRepository>,
        updates: Arc<ShipmentUpdateRepository>,
        notifier: Arc<NotificationService>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            pool,
            shipments,
            updates,
            notifier,
            store,
            machine: ShipmentMachine,
        }
    }

    /// Creates a shipment and notifies the counterparty.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateShipment,
    ) -> AppResult<Shipment> {
        let (importer_id, agent_id) = match ctx.role {
            UserRole::Importer => (ctx.user_id, input.counterparty_id),
            UserRole::Agent => (input.counterparty_id, ctx.user_id),
            UserRole::Admin => {
                return Err(AppError::forbidden(
                    "Administrators cannot create shipments",
                ));
            }
        };
        if input.mode != ShipmentMode::Land && !input.trucks.is_empty() {
            return Err(AppError::validation(
                "Truck entries are only valid for land shipments",
            ));
        }
        if input.clearance_charges_minor < 0 {
            return Err(AppError::validation("Clearance charges cannot be negative"));
        }

        let id = Uuid::new_v4();

        // Store the document before opening the transaction; a failed
        // upload must not leave a half-created shipment behind.
        let document_url = match &input.document {
            Some(doc) => Some(
                self.store
                    .put(
                        &format!("shipments/{id}/{}", doc.safe_file_name()),
                        doc.data.clone(),
                        &doc.content_type,
                    )
                    .await?,
            ),
            None => None,
        };

        let mut tx = self.begin().await?;

        let seq = self.shipments.next_reference_seq(&mut tx).await?;
        let now = Utc::now();
        let shipment = Shipment {
            id,
            reference: format!("SHP-{}-{:06}", now.year(), seq),
            mode: input.mode,
            origin_port: input.origin_port,
            destination_port: input.destination_port,
            etd: input.etd,
            eta: input.eta,
            bill_of_lading_number: input.bill_of_lading_number,
            bayan_number: input.bayan_number,
            document_url,
            importer_id,
            agent_id,
            created_by: ctx.user_id,
            clearance_charges_minor: input.clearance_charges_minor,
            status: ShipmentStatus::Assigned,
            is_accepted: false,
            is_completed: false,
            created_at: now,
            updated_at: now,
        };
        let shipment = self.shipments.create_in(&mut tx, &shipment).await?;

        for truck in &input.trucks {
            self.shipments
                .add_truck_in(
                    &mut tx,
                    id,
                    &truck.truck_number,
                    truck.driver_name.as_deref(),
                    truck.driver_phone.as_deref(),
                )
                .await?;
        }

        let notification = self
            .notifier
            .record_in(
                &mut tx,
                &NewNotification {
                    recipient_id: shipment.counterparty_of(ctx.user_id),
                    sender_id: ctx.user_id,
                    title: "New Shipment".to_string(),
                    message: format!("Shipment {} has been assigned to you", shipment.reference),
                    entity_type: NotificationEntityType::Shipment,
                    entity_id: id,
                    shipment_id: Some(id),
                },
            )
            .await?;

        self.commit(tx).await?;
        self.notifier.publish(&notification);

        info!(
            shipment_id = %id,
            reference = %shipment.reference,
            created_by = %ctx.user_id,
            "Shipment created"
        );
        Ok(shipment)
    }

    /// Fetches a shipment the current user may see.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Shipment> {
        let shipment = self
            .shipments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment not found"))?;
        self.authorize_party(ctx, &shipment)?;
        Ok(shipment)
    }

    /// Lists shipments: all of them for admins, the user's own otherwise.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Shipment>> {
        if ctx.is_admin() {
            self.shipments.list_all(page).await
        } else {
            self.shipments.list_for_user(ctx.user_id, page).await
        }
    }

    /// Lists the truck entries of a land shipment.
    pub async fn trucks(&self, ctx: &RequestContext, id: Uuid) -> AppResult<Vec<ShipmentTruck>> {
        self.get(ctx, id).await?;
        self.shipments.list_trucks(id).await
    }

    /// Lists the audit trail of a shipment, newest first.
    pub async fn updates(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShipmentUpdate>> {
        self.get(ctx, id).await?;
        self.updates.list_for_shipment(id, page).await
    }

    /// The assigned agent accepts the shipment.
    pub async fn accept(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        note: Option<String>,
    ) -> AppResult<Shipment> {
        let mut tx = self.begin().await?;

        let shipment = self
            .shipments
            .find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment not found"))?;
        self.authorize_agent(ctx, &shipment)?;

        let transition = self.machine.accept(&shipment)?;
        let updated = self
            .shipments
            .apply_transition_in(
                &mut tx,
                id,
                transition.status,
                transition.is_accepted,
                transition.is_completed,
            )
            .await?;

        // An audit entry is appended only when the agent supplied a note.
        if let Some(note) = note {
            self.updates
                .append_in(&mut tx, id, &note, None, ctx.user_id)
                .await?;
        }

        let notification = self
            .notifier
            .record_in(
                &mut tx,
                &NewNotification {
                    recipient_id: shipment.importer_id,
                    sender_id: ctx.user_id,
                    title: "Shipment Accepted".to_string(),
                    message: format!(
                        "Shipment {} was accepted by your clearance agent",
                        shipment.reference
                    ),
                    entity_type: NotificationEntityType::Shipment,
                    entity_id: id,
                    shipment_id: Some(id),
                },
            )
            .await?;

        self.commit(tx).await?;
        self.notifier.publish(&notification);

        info!(shipment_id = %id, agent_id = %ctx.user_id, "Shipment accepted");
        Ok(updated)
    }

    /// Either party closes out the shipment once clearance is done.
    /// The other party is notified.
    pub async fn complete(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        note: Option<String>,
    ) -> AppResult<Shipment> {
        let mut tx = self.begin().await?;

        let shipment = self
            .shipments
            .find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment not found"))?;
        self.authorize_participant(ctx, &shipment)?;

        let transition = self.machine.complete(&shipment)?;
        let updated = self
            .shipments
            .apply_transition_in(
                &mut tx,
                id,
                transition.status,
                transition.is_accepted,
                transition.is_completed,
            )
            .await?;

        let message = note.unwrap_or_else(|| "Clearance completed".to_string());
        self.updates
            .append_in(&mut tx, id, &message, None, ctx.user_id)
            .await?;

        let notification = self
            .notifier
            .record_in(
                &mut tx,
                &NewNotification {
                    recipient_id: shipment.counterparty_of(ctx.user_id),
                    sender_id: ctx.user_id,
                    title: "Shipment Completed".to_string(),
                    message: format!(
                        "Customs clearance for shipment {} is complete",
                        shipment.reference
                    ),
                    entity_type: NotificationEntityType::Shipment,
                    entity_id: id,
                    shipment_id: Some(id),
                },
            )
            .await?;

        self.commit(tx).await?;
        self.notifier.publish(&notification);

        info!(shipment_id = %id, actor_id = %ctx.user_id, "Shipment completed");
        Ok(updated)
    }

    /// Applies a tracking update: a status change (agent only), a note, a
    /// document, or any combination.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        change: ShipmentChange,
    ) -> AppResult<Shipment> {
        if change.status.is_none() && change.note.is_none() && change.document.is_none() {
            return Err(AppError::validation("Nothing to update"));
        }

        // Preflight authorization before touching storage so a forbidden
        // caller cannot leave orphaned documents behind.
        let preflight = self
            .shipments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment not found"))?;
        if change.status.is_some() {
            self.authorize_agent(ctx, &preflight)?;
        } else {
            self.authorize_participant(ctx, &preflight)?;
        }

        let document_url = match &change.document {
            Some(doc) => Some(
                self.store
                    .put(
                        &format!("shipments/{id}/updates/{}-{}", Uuid::new_v4(), doc.safe_file_name()),
                        doc.data.clone(),
                        &doc.content_type,
                    )
                    .await?,
            ),
            None => None,
        };

        let mut tx = self.begin().await?;

        let shipment = self
            .shipments
            .find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Shipment not found"))?;

        // Two independent effects: a status change notifying the importer,
        // and a note/document audit entry notifying the other party. Either,
        // both, or neither may fire in one call.
        let mut notifications = Vec::new();

        let updated = match change.status {
            Some(target) => {
                let transition = self.machine.update_status(&shipment, target)?;
                let updated = self
                    .shipments
                    .apply_transition_in(
                        &mut tx,
                        id,
                        transition.status,
                        transition.is_accepted,
                        transition.is_completed,
                    )
                    .await?;

                notifications.push(
                    self.notifier
                        .record_in(
                            &mut tx,
                            &NewNotification {
                                recipient_id: shipment.importer_id,
                                sender_id: ctx.user_id,
                                title: "Shipment Status Updated".to_string(),
                                message: format!(
                                    "Shipment {} is now {}",
                                    shipment.reference,
                                    target.label()
                                ),
                                entity_type: NotificationEntityType::Shipment,
                                entity_id: id,
                                shipment_id: Some(id),
                            },
                        )
                        .await?,
                );
                updated
            }
            None => shipment.clone(),
        };

        if change.note.is_some() || document_url.is_some() {
            let message = change
                .note
                .clone()
                .unwrap_or_else(|| "Document added".to_string());
            self.updates
                .append_in(&mut tx, id, &message, document_url.as_deref(), ctx.user_id)
                .await?;

            notifications.push(
                self.notifier
                    .record_in(
                        &mut tx,
                        &NewNotification {
                            recipient_id: shipment.counterparty_of(ctx.user_id),
                            sender_id: ctx.user_id,
                            title: "New Shipment Update".to_string(),
                            message: format!("Shipment {}: {message}", shipment.reference),
                            entity_type: NotificationEntityType::Shipment,
                            entity_id: id,
                            shipment_id: Some(id),
                        },
                    )
                    .await?,
            );
        }

        self.commit(tx).await?;
        for notification in &notifications {
            self.notifier.publish(notification);
        }

        info!(
            shipment_id = %id,
            user_id = %ctx.user_id,
            status = ?change.status,
            "Shipment updated"
        );
        Ok(updated)
    }

    fn authorize_party(&self, ctx: &RequestContext, shipment: &Shipment) -> AppResult<()> {
        if ctx.is_admin() || ctx.user_id == shipment.importer_id || ctx.user_id == shipment.agent_id
        {
            Ok(())
        } else {
            Err(AppError::forbidden("Not a party to this shipment"))
        }
    }

    fn authorize_participant(&self, ctx: &RequestContext, shipment: &Shipment) -> AppResult<()> {
        if ctx.user_id == shipment.importer_id || ctx.user_id == shipment.agent_id {
            Ok(())
        } else {
            Err(AppError::forbidden("Not a party to this shipment"))
        }
    }

    fn authorize_agent(&self, ctx: &RequestContext, shipment: &Shipment) -> AppResult<()> {
        if ctx.user_id == shipment.agent_id {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Only the assigned agent can perform this action",
            ))
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
