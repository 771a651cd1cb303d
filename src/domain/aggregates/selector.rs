//! Order-Item Selector

use rust_decimal::Decimal;
use crate::domain::aggregates::ReturnItemDraft;
use crate::domain::events::{DomainEvent, SelectionEvent};
use crate::OrderItemInfo;

#[derive(Clone, Debug)]
struct Row {
    draft: ReturnItemDraft,
    selected: bool,
}

/// Drafts for every line of one order, with the operator's selection.
#[derive(Clone, Debug, Default)]
pub struct ReturnSelector {
    rows: Vec<Row>,
    events: Vec<DomainEvent>,
}

impl ReturnSelector {
    pub fn from_order_items(items: &[OrderItemInfo]) -> Self {
        let mut selector = Self::default();
        for item in items {
            let draft = ReturnItemDraft::from_order_item(item);
            selector.raise_event(DomainEvent::Selection(SelectionEvent::DraftCreated {
                product_id: draft.product_id(), quantity: draft.quantity(), refund_total: draft.refund_total(),
            }));
            selector.rows.push(Row { draft, selected: false });
        }
        selector
    }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    pub fn selected_count(&self) -> usize { self.rows.iter().filter(|r| r.selected).count() }

    pub fn drafts(&self) -> impl Iterator<Item = &ReturnItemDraft> { self.rows.iter().map(|r| &r.draft) }

    /// Selected drafts in order-line order.
    pub fn selected_drafts(&self) -> Vec<ReturnItemDraft> {
        self.rows.iter().filter(|r| r.selected).map(|r| r.draft.clone()).collect()
    }

    pub fn draft(&self, product_id: i64) -> Option<&ReturnItemDraft> {
        self.rows.iter().find(|r| r.draft.product_id() == product_id).map(|r| &r.draft)
    }

    pub fn is_selected(&self, product_id: i64) -> bool {
        self.rows.iter().any(|r| r.selected && r.draft.product_id() == product_id)
    }

    pub fn select(&mut self, product_id: i64) -> Result<(), SelectorError> { self.mark(product_id, true) }

    pub fn deselect(&mut self, product_id: i64) -> Result<(), SelectorError> { self.mark(product_id, false) }

    pub fn toggle(&mut self, product_id: i64) -> Result<bool, SelectorError> {
        let selected = !self.row(product_id)?.selected;
        self.mark(product_id, selected)?;
        Ok(selected)
    }

    pub fn select_all(&mut self) {
        let ids: Vec<i64> = self.rows.iter().filter(|r| !r.selected).map(|r| r.draft.product_id()).collect();
        for product_id in ids {
            let _ = self.mark(product_id, true);
        }
    }

    pub fn clear_selection(&mut self) {
        let ids: Vec<i64> = self.rows.iter().filter(|r| r.selected).map(|r| r.draft.product_id()).collect();
        for product_id in ids {
            let _ = self.mark(product_id, false);
        }
    }

    /// Sets the return quantity, clamped to the purchased quantity. Returns the applied value.
    pub fn set_quantity(&mut self, product_id: i64, requested: u32) -> Result<u32, SelectorError> {
        let row = self.row_mut(product_id)?;
        let (applied, clamped) = row.draft.set_quantity(requested);
        let refund_total = row.draft.refund_total();
        if clamped {
            self.raise_event(DomainEvent::Selection(SelectionEvent::QuantityClamped { product_id, requested, applied }));
        }
        self.raise_event(DomainEvent::Selection(SelectionEvent::QuantityChanged { product_id, quantity: applied, refund_total }));
        Ok(applied)
    }

    pub fn total_refund(&self) -> Decimal {
        self.rows.iter().filter(|r| r.selected).fold(Decimal::ZERO, |acc, r| acc + r.draft.refund_total())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }

    fn mark(&mut self, product_id: i64, selected: bool) -> Result<(), SelectorError> {
        let row = self.row_mut(product_id)?;
        if row.selected == selected { return Ok(()); }
        row.selected = selected;
        let event = if selected { SelectionEvent::Selected { product_id } } else { SelectionEvent::Deselected { product_id } };
        self.raise_event(DomainEvent::Selection(event));
        Ok(())
    }

    fn row(&self, product_id: i64) -> Result<&Row, SelectorError> {
        self.rows.iter().find(|r| r.draft.product_id() == product_id).ok_or(SelectorError::UnknownProduct(product_id))
    }

    fn row_mut(&mut self, product_id: i64) -> Result<&mut Row, SelectorError> {
        self.rows.iter_mut().find(|r| r.draft.product_id() == product_id).ok_or(SelectorError::UnknownProduct(product_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum SelectorError { UnknownProduct(i64) }
impl std::error::Error for SelectorError {}
impl std::fmt::Display for SelectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::UnknownProduct(id) => write!(f, "Product {id} is not on this order") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Vec<OrderItemInfo> {
        vec![
            OrderItemInfo { order_item_id: Some(1), product_id: 10, product_name: "Mug".into(), quantity: 3, product_price: Decimal::new(100, 0), discount_amount: Decimal::new(30, 0) },
            OrderItemInfo { order_item_id: Some(2), product_id: 20, product_name: "Tee".into(), quantity: 2, product_price: Decimal::new(2550, 2), discount_amount: Decimal::ZERO },
        ]
    }

    #[test]
    fn test_selection_workflow() {
        let mut selector = ReturnSelector::from_order_items(&order());
        assert_eq!(selector.len(), 2);
        assert_eq!(selector.selected_count(), 0);
        selector.select(20).unwrap();
        selector.select(10).unwrap();
        let ids: Vec<i64> = selector.selected_drafts().iter().map(|d| d.product_id()).collect();
        assert_eq!(ids, vec![10, 20]); // order-line order
        assert_eq!(selector.total_refund(), Decimal::new(321, 0));
        assert!(!selector.toggle(20).unwrap());
        assert_eq!(selector.total_refund(), Decimal::new(270, 0));
    }

    #[test]
    fn test_quantity_clamped_and_recorded() {
        let mut selector = ReturnSelector::from_order_items(&order());
        selector.take_events();
        assert_eq!(selector.set_quantity(10, 5).unwrap(), 3);
        assert_eq!(selector.draft(10).unwrap().refund_total(), Decimal::new(270, 0));
        let events = selector.take_events();
        assert_eq!(events[0], DomainEvent::Selection(SelectionEvent::QuantityClamped { product_id: 10, requested: 5, applied: 3 }));
        assert_eq!(selector.set_quantity(10, 0).unwrap(), 0);
        assert_eq!(selector.draft(10).unwrap().refund_total(), Decimal::ZERO);
    }

    #[test]
    fn test_unknown_product() {
        let mut selector = ReturnSelector::from_order_items(&order());
        assert_eq!(selector.select(99), Err(SelectorError::UnknownProduct(99)));
        assert_eq!(selector.set_quantity(99, 1), Err(SelectorError::UnknownProduct(99)));
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut selector = ReturnSelector::from_order_items(&order());
        selector.select_all();
        assert_eq!(selector.selected_count(), 2);
        assert!(selector.is_selected(10));
        selector.clear_selection();
        assert!(selector.selected_drafts().is_empty());
    }
}
