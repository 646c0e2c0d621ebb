//! AddOrder command handler
//!
//! Appends a timestamped batch of line items to an open tab. Every item
//! must reference an existing catalog product; the current catalog price is
//! captured into the line item and never re-read, so later catalog edits
//! cannot change what the guest owes.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::tabs::money;
use crate::tabs::traits::{CommandContext, CommandHandler, CommandMetadata, TabError};
use shared::models::Product;
use shared::tab::types::{CommandErrorCode, ItemStatus, LineItem, OrderItemInput};
use shared::tab::{EventPayload, TabEvent, TabEventType};

use super::{ensure_open, load_owned_snapshot};

/// AddOrder action
#[derive(Debug, Clone)]
pub struct AddOrderAction {
    pub tab_id: String,
    pub items: Vec<OrderItemInput>,
    /// Catalog metadata injected by the manager (product_id → product)
    pub products: HashMap<String, Product>,
}

#[async_trait]
impl CommandHandler for AddOrderAction {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<TabEvent>, TabError> {
        let snapshot = load_owned_snapshot(ctx, &self.tab_id, &metadata.tenant_id)?;
        ensure_open(&snapshot, &self.tab_id)?;

        if self.items.is_empty() {
            return Err(TabError::InvalidOperation(
                CommandErrorCode::EmptyOrder,
                "An order batch must contain at least one item".to_string(),
            ));
        }

        let mut line_items = Vec::with_capacity(self.items.len());
        for input in &self.items {
            money::validate_order_item(input)?;

            let product = self
                .products
                .get(&input.product_id)
                .filter(|p| p.is_active)
                .ok_or_else(|| {
                    TabError::InvalidOperation(
                        CommandErrorCode::ProductNotFound,
                        format!("Product {} not found in catalog", input.product_id),
                    )
                })?;
            money::validate_price(product.price)?;

            line_items.push(LineItem {
                product_id: product.product_id.clone(),
                name: product.name.clone(),
                category_name: product.category_name.clone(),
                unit_price: product.price,
                quantity: input.quantity,
                note: input.note.clone(),
                status: ItemStatus::Pending,
                status_log: vec![],
            });
        }

        let seq = ctx.next_sequence();
        let event = TabEvent::new(
            seq,
            self.tab_id.clone(),
            metadata.operator_id.clone(),
            metadata.operator_name.clone(),
            metadata.command_id.clone(),
            Some(metadata.timestamp),
            TabEventType::OrderAdded,
            EventPayload::OrderAdded {
                order_idx: snapshot.orders.len() as u32,
                ordered_at: shared::util::now_millis(),
                items: line_items,
            },
        );

        Ok(vec![event])
    }
}
