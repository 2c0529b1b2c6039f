//! List diffing.
//!
//! Two rows are the *same row* when their identity keys match; the same row
//! needs a re-render when its content differs. The script produced by
//! [`calculate_diff`] turns the old list into the new one when applied in
//! order:
//!
//! 1. removals, highest old position first;
//! 2. moves, `from`/`to` being positions in the list as it is at that point
//!    (`to` is where the row ends up once taken out of `from`);
//! 3. insertions, lowest new position first;
//! 4. content changes, at positions in the new list.
//!
//! Rows whose relative order survives (the longest increasing run of old
//! positions) never move, so the number of moves is as small as it can be.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// A row that can be matched across two list versions.
pub trait DiffItem: PartialEq {
    type Id: Eq + Hash + Copy;

    fn id(&self) -> Self::Id;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListUpdate {
    Removed { position: usize },
    Moved { from: usize, to: usize },
    Inserted { position: usize },
    Changed { position: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub updates: Vec<ListUpdate>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Feed the script to a renderer.
    pub fn dispatch_updates_to(&self, callback: &mut impl ListUpdateCallback) {
        for update in &self.updates {
            match *update {
                ListUpdate::Removed { position } => callback.on_removed(position),
                ListUpdate::Moved { from, to } => callback.on_moved(from, to),
                ListUpdate::Inserted { position } => callback.on_inserted(position),
                ListUpdate::Changed { position } => callback.on_changed(position),
            }
        }
    }
}

/// Receiver of list deltas, implemented by whatever draws the rows.
pub trait ListUpdateCallback {
    fn on_inserted(&mut self, position: usize);
    fn on_removed(&mut self, position: usize);
    fn on_moved(&mut self, from: usize, to: usize);
    fn on_changed(&mut self, position: usize);
}

/// Callback that simply records what it was told, in order.
#[derive(Debug, Default)]
pub struct UpdateLog {
    pub updates: Vec<ListUpdate>,
}

impl ListUpdateCallback for UpdateLog {
    fn on_inserted(&mut self, position: usize) {
        self.updates.push(ListUpdate::Inserted { position });
    }
    fn on_removed(&mut self, position: usize) {
        self.updates.push(ListUpdate::Removed { position });
    }
    fn on_moved(&mut self, from: usize, to: usize) {
        self.updates.push(ListUpdate::Moved { from, to });
    }
    fn on_changed(&mut self, position: usize) {
        self.updates.push(ListUpdate::Changed { position });
    }
}

pub fn calculate_diff<T: DiffItem>(old: &[T], new: &[T]) -> DiffResult {
    let mut updates = Vec::new();

    let old_pos: HashMap<T::Id, usize> = old.iter().enumerate().map(|(i, r)| (r.id(), i)).collect();
    let new_ids: HashSet<T::Id> = new.iter().map(DiffItem::id).collect();

    // 1. removals
    for (i, row) in old.iter().enumerate().rev() {
        if !new_ids.contains(&row.id()) {
            updates.push(ListUpdate::Removed { position: i });
        }
    }

    // rows present in both lists, in new order
    let target: Vec<T::Id> = new
        .iter()
        .map(DiffItem::id)
        .filter(|id| old_pos.contains_key(id))
        .collect();
    let mut working: Vec<T::Id> = old
        .iter()
        .map(DiffItem::id)
        .filter(|id| new_ids.contains(id))
        .collect();

    // 2. moves: every row outside the stable run goes right after its predecessor
    let stable = longest_increasing_run(&target, &old_pos);
    for (k, id) in target.iter().enumerate() {
        if stable.contains(id) {
            continue;
        }
        let Some(from) = working.iter().position(|w| w == id) else {
            continue;
        };
        working.remove(from);
        let to = match k.checked_sub(1).map(|p| target[p]) {
            Some(pred) => working.iter().position(|w| *w == pred).map_or(0, |p| p + 1),
            None => 0,
        };
        working.insert(to, *id);
        if from != to {
            updates.push(ListUpdate::Moved { from, to });
        }
    }

    // 3. insertions
    for (i, row) in new.iter().enumerate() {
        if !old_pos.contains_key(&row.id()) {
            updates.push(ListUpdate::Inserted { position: i });
        }
    }

    // 4. content changes
    for (i, row) in new.iter().enumerate() {
        if let Some(&j) = old_pos.get(&row.id())
            && old[j] != *row
        {
            updates.push(ListUpdate::Changed { position: i });
        }
    }

    DiffResult { updates }
}

/// Ids of `target` forming the longest run whose old positions increase.
fn longest_increasing_run<Id: Eq + Hash + Copy>(
    target: &[Id],
    old_pos: &HashMap<Id, usize>,
) -> HashSet<Id> {
    let positions: Vec<usize> = target.iter().map(|id| old_pos[id]).collect();

    // tails[l] = index (into positions) of the smallest tail of a run of length l+1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; positions.len()];

    for (i, &p) in positions.iter().enumerate() {
        let l = tails.partition_point(|&t| positions[t] < p);
        if l > 0 {
            prev[i] = Some(tails[l - 1]);
        }
        if l == tails.len() {
            tails.push(i);
        } else {
            tails[l] = i;
        }
    }

    let mut stable = HashSet::new();
    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        stable.insert(target[i]);
        cursor = prev[i];
    }
    stable
}
