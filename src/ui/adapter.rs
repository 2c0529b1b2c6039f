//! Night list adapter: header + one row per night, updated by deltas.

use crate::models::night::SleepNight;
use crate::ui::diff::{DiffItem, DiffResult, ListUpdateCallback, calculate_diff};
use crate::ui::rows::{RowStyle, ViewHolder, ViewType};
use tokio::sync::mpsc;
use tracing::debug;

/// Identity key of the header row; night ids are never negative.
pub const HEADER_ID: i64 = i64::MIN;

#[derive(Debug, Clone, PartialEq)]
pub enum DataItem {
    Header,
    SleepNightItem(SleepNight),
}

impl DiffItem for DataItem {
    type Id = i64;

    fn id(&self) -> i64 {
        match self {
            DataItem::Header => HEADER_ID,
            DataItem::SleepNightItem(night) => night.night_id,
        }
    }
}

/// One header followed by the nights, order preserved.
pub fn add_header(nights: Vec<SleepNight>) -> Vec<DataItem> {
    let mut items = Vec::with_capacity(nights.len() + 1);
    items.push(DataItem::Header);
    items.extend(nights.into_iter().map(DataItem::SleepNightItem));
    items
}

pub struct SleepNightAdapter<F>
where
    F: FnMut(&SleepNight),
{
    items: Vec<DataItem>,
    style: RowStyle,
    on_click: F,
    submit_tx: mpsc::UnboundedSender<(u64, Vec<DataItem>)>,
    submit_rx: mpsc::UnboundedReceiver<(u64, Vec<DataItem>)>,
    submitted: u64,
    applied: u64,
}

impl<F> SleepNightAdapter<F>
where
    F: FnMut(&SleepNight),
{
    pub fn new(style: RowStyle, on_click: F) -> Self {
        let (submit_tx, submit_rx) = mpsc::unbounded_channel();
        Self {
            items: Vec::new(),
            style,
            on_click,
            submit_tx,
            submit_rx,
            submitted: 0,
            applied: 0,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn get_item(&self, position: usize) -> Option<&DataItem> {
        self.items.get(position)
    }

    pub fn current_list(&self) -> &[DataItem] {
        &self.items
    }

    pub fn get_item_view_type(&self, position: usize) -> Option<ViewType> {
        self.items.get(position).map(|item| match item {
            DataItem::Header => ViewType::Header,
            DataItem::SleepNightItem(_) => ViewType::Item,
        })
    }

    pub fn create_view_holder(&self, view_type: ViewType) -> ViewHolder {
        ViewHolder::create(view_type, &self.style)
    }

    pub fn bind_view_holder(&self, holder: &mut ViewHolder, position: usize) {
        if let (ViewHolder::Night(h), Some(DataItem::SleepNightItem(night))) =
            (holder, self.items.get(position))
        {
            h.bind(night);
        }
    }

    /// Create and bind the row at `position`.
    pub fn render_row(&self, position: usize) -> Option<String> {
        let view_type = self.get_item_view_type(position)?;
        let mut holder = self.create_view_holder(view_type);
        self.bind_view_holder(&mut holder, position);
        Some(holder.render())
    }

    /// Every row, top to bottom.
    pub fn render_all(&self) -> Vec<String> {
        (0..self.items.len())
            .filter_map(|p| self.render_row(p))
            .collect()
    }

    /// Tap on a row: night rows report their night, the header does nothing.
    pub fn click(&mut self, position: usize) {
        if let Some(DataItem::SleepNightItem(night)) = self.items.get(position) {
            (self.on_click)(night);
        }
    }

    /// Replace the displayed list, sending only the delta to `callback`.
    pub fn submit_list(
        &mut self,
        items: Vec<DataItem>,
        callback: &mut impl ListUpdateCallback,
    ) -> DiffResult {
        let diff = calculate_diff(&self.items, &items);
        self.items = items;
        diff.dispatch_updates_to(callback);
        diff
    }

    /// Build the row list on a background task; it is applied by
    /// [`next_submission`](Self::next_submission) or
    /// [`apply_pending`](Self::apply_pending).
    ///
    /// Must be called from within a tokio runtime.
    pub fn add_header_and_submit_list(&mut self, nights: Vec<SleepNight>) {
        self.submitted += 1;
        let generation = self.submitted;
        let tx = self.submit_tx.clone();
        tokio::spawn(async move {
            let items = add_header(nights);
            // receiver lives as long as the adapter
            let _ = tx.send((generation, items));
        });
    }

    fn apply_submission(
        &mut self,
        generation: u64,
        items: Vec<DataItem>,
        callback: &mut impl ListUpdateCallback,
    ) -> Option<DiffResult> {
        if generation <= self.applied {
            debug!(generation, applied = self.applied, "dropping stale list");
            return None;
        }
        self.applied = generation;
        Some(self.submit_list(items, callback))
    }

    /// Wait for the next background-built list that is newer than the one on
    /// screen and apply it.
    pub async fn next_submission(
        &mut self,
        callback: &mut impl ListUpdateCallback,
    ) -> Option<DiffResult> {
        while self.applied < self.submitted {
            let (generation, items) = self.submit_rx.recv().await?;
            if let Some(diff) = self.apply_submission(generation, items, callback) {
                return Some(diff);
            }
        }
        None
    }

    /// Apply whatever finished lists are ready without waiting. Only the newest
    /// one reaches `callback`.
    pub fn apply_pending(&mut self, callback: &mut impl ListUpdateCallback) -> Option<DiffResult> {
        let mut newest: Option<(u64, Vec<DataItem>)> = None;
        while let Ok((generation, items)) = self.submit_rx.try_recv() {
            if newest.as_ref().is_none_or(|(g, _)| generation > *g) {
                newest = Some((generation, items));
            }
        }
        let (generation, items) = newest?;
        self.apply_submission(generation, items, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::diff::{ListUpdate, UpdateLog};
    use std::collections::HashSet;

    fn night(id: i64) -> SleepNight {
        let mut n = SleepNight::started_at(id * 1_000);
        n.night_id = id;
        n
    }

    #[test]
    fn header_comes_first_and_order_is_kept() {
        for nights in [vec![], vec![night(3), night(1), night(2)]] {
            let items = add_header(nights.clone());

            assert_eq!(items.len(), nights.len() + 1);
            assert_eq!(items[0], DataItem::Header);
            let ids: Vec<i64> = items[1..].iter().map(DiffItem::id).collect();
            let expected: Vec<i64> = nights.iter().map(|n| n.night_id).collect();
            assert_eq!(ids, expected);

            let unique: HashSet<i64> = items.iter().map(DiffItem::id).collect();
            assert_eq!(unique.len(), items.len());
        }
    }

    #[test]
    fn resubmitting_the_same_list_sends_nothing() {
        let mut adapter = SleepNightAdapter::new(RowStyle::default(), |_: &SleepNight| {});
        let mut rec = UpdateLog::default();

        adapter.submit_list(add_header(vec![night(2), night(1)]), &mut rec);
        assert_eq!(rec.updates.len(), 3);

        let diff = adapter.submit_list(add_header(vec![night(2), night(1)]), &mut rec);
        assert!(diff.is_empty());
        assert_eq!(rec.updates.len(), 3);
    }

    #[test]
    fn rating_a_night_is_a_single_change() {
        let mut adapter = SleepNightAdapter::new(RowStyle::default(), |_: &SleepNight| {});
        let mut rec = UpdateLog::default();
        adapter.submit_list(add_header(vec![night(2), night(1)]), &mut rec);

        let mut rated = night(1);
        rated.sleep_quality = 4;
        let diff = adapter.submit_list(add_header(vec![night(2), rated]), &mut rec);

        assert_eq!(diff.updates, vec![ListUpdate::Changed { position: 2 }]);
    }

    #[test]
    fn view_types_and_clicks() {
        let mut clicked = Vec::new();
        {
            let mut adapter =
                SleepNightAdapter::new(RowStyle::default(), |n: &SleepNight| clicked.push(n.night_id));
            adapter.submit_list(add_header(vec![night(5)]), &mut UpdateLog::default());

            assert_eq!(adapter.get_item_view_type(0), Some(ViewType::Header));
            assert_eq!(adapter.get_item_view_type(1), Some(ViewType::Item));
            assert_eq!(adapter.get_item_view_type(2), None);

            adapter.click(0);
            adapter.click(1);
            adapter.click(9);
            assert_eq!(adapter.render_all().len(), 2);
        }
        assert_eq!(clicked, vec![5]);
    }

    #[tokio::test]
    async fn background_lists_are_applied_whole() {
        let mut adapter = SleepNightAdapter::new(RowStyle::default(), |_: &SleepNight| {});
        let mut rec = UpdateLog::default();

        adapter.add_header_and_submit_list(vec![night(1)]);
        let diff = adapter.next_submission(&mut rec).await.unwrap();
        assert_eq!(diff.len(), 2);
        assert_eq!(adapter.item_count(), 2);

        adapter.add_header_and_submit_list(vec![]);
        adapter.next_submission(&mut rec).await.unwrap();
        assert_eq!(adapter.current_list(), &[DataItem::Header]);

        assert!(adapter.next_submission(&mut rec).await.is_none());
    }

    #[tokio::test]
    async fn only_the_newest_pending_list_is_applied() {
        let mut adapter = SleepNightAdapter::new(RowStyle::default(), |_: &SleepNight| {});
        let mut rec = UpdateLog::default();

        adapter.add_header_and_submit_list(vec![night(1)]);
        adapter.add_header_and_submit_list(vec![night(2), night(1)]);
        while adapter.submit_rx.len() < 2 {
            tokio::task::yield_now().await;
        }

        adapter.apply_pending(&mut rec);
        let ids: Vec<i64> = adapter.current_list().iter().map(DiffItem::id).collect();
        assert_eq!(ids, vec![HEADER_ID, 2, 1]);
        // the older list never reached the callback
        assert_eq!(rec.updates.len(), 3);
        assert!(rec.updates.iter().all(|u| matches!(u, ListUpdate::Inserted { .. })));
        assert_eq!(adapter.applied, adapter.submitted);
        assert!(adapter.next_submission(&mut rec).await.is_none());
    }
}
