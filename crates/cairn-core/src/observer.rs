//! Intersection and resize observation with scoped disposal.
//!
//! An [`ObserverSet`] plays the role of the layout engine's observers: the
//! host calls [`collect`](ObserverSet::collect) after every layout pass and
//! forwards the resulting [`ObserverRecord`]s to whoever registered them.
//! Registrations are held alive by an [`Observation`] guard; dropping the
//! guard disposes the registration, so a popup that is thrown away stops
//! being notified without any explicit teardown call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ratatui::layout::Rect;

use crate::document::Document;
use crate::dom::NodeId;

/// Identity of one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationId(u64);

/// What a registration watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationKind {
    /// The target's intersection with the viewport.
    Intersection,
    /// The target's size.
    Resize,
}

/// Geometry of a target relative to the viewport at one layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    /// The observed element.
    pub target: NodeId,
    /// The part of the target inside the viewport, in viewport coordinates.
    pub intersection_rect: Rect,
    /// The viewport.
    pub root_bounds: Rect,
    /// Whether any part of the target is inside the viewport.
    pub is_intersecting: bool,
}

/// A change reported by [`ObserverSet::collect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverRecord {
    /// The intersection of a target with the viewport changed.
    Intersection {
        /// The registration that produced this record.
        id: ObservationId,
        /// The new geometry.
        entry: IntersectionEntry,
    },
    /// A target was resized.
    Resize {
        /// The registration that produced this record.
        id: ObservationId,
        /// The observed element.
        target: NodeId,
        /// New (width, height).
        size: (u16, u16),
    },
}

impl ObserverRecord {
    /// The registration this record belongs to.
    pub fn id(&self) -> ObservationId {
        match self {
            ObserverRecord::Intersection { id, .. } | ObserverRecord::Resize { id, .. } => *id,
        }
    }
}

/// Guard keeping a registration alive.
///
/// Dropping it (or calling [`disconnect`](Observation::disconnect)) stops
/// the registration; the set prunes it on its next collection.
#[derive(Debug)]
pub struct Observation {
    id: ObservationId,
    active: Arc<AtomicBool>,
}

impl Observation {
    /// The registration id, matched against [`ObserverRecord::id`].
    pub fn id(&self) -> ObservationId {
        self.id
    }

    /// Whether the registration is still live.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Stop observing.
    pub fn disconnect(self) {}
}

impl Drop for Observation {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Snapshot {
    Intersection(IntersectionEntry),
    Size(u16, u16),
}

struct Registration {
    id: ObservationId,
    target: NodeId,
    kind: ObservationKind,
    active: Arc<AtomicBool>,
    last: Option<Snapshot>,
}

/// All live intersection and resize registrations of one document.
#[derive(Default)]
pub struct ObserverSet {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl ObserverSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch `target`'s intersection with the viewport.
    pub fn observe_intersection(&mut self, target: NodeId) -> Observation {
        self.observe(target, ObservationKind::Intersection)
    }

    /// Watch `target`'s size.
    pub fn observe_resize(&mut self, target: NodeId) -> Observation {
        self.observe(target, ObservationKind::Resize)
    }

    fn observe(&mut self, target: NodeId, kind: ObservationKind) -> Observation {
        self.next_id += 1;
        let id = ObservationId(self.next_id);
        let active = Arc::new(AtomicBool::new(true));
        self.registrations.push(Registration {
            id,
            target,
            kind,
            active: Arc::clone(&active),
            last: None,
        });
        Observation { id, active }
    }

    /// Force the next [`collect`](ObserverSet::collect) to report `id` even
    /// if its geometry is unchanged.
    pub fn refresh(&mut self, id: ObservationId) {
        if let Some(reg) = self.registrations.iter_mut().find(|r| r.id == id) {
            reg.last = None;
        }
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.registrations
            .iter()
            .filter(|r| r.active.load(Ordering::Acquire))
            .count()
    }

    /// Whether no registration is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compare every live registration against the document's current
    /// layout and report the ones that changed.
    ///
    /// Disposed registrations are pruned. Targets no longer in the document
    /// are skipped until they come back.
    pub fn collect<D: Document>(&mut self, doc: &D) -> Vec<ObserverRecord> {
        self.registrations
            .retain(|r| r.active.load(Ordering::Acquire));

        let viewport = doc.viewport();
        let mut records = Vec::new();
        for reg in &mut self.registrations {
            if !doc.contains(reg.target) {
                continue;
            }
            let rect = doc.rect(reg.target);
            let snapshot = match reg.kind {
                ObservationKind::Intersection => {
                    Snapshot::Intersection(intersect(reg.target, rect, viewport))
                }
                ObservationKind::Resize => Snapshot::Size(rect.width, rect.height),
            };
            if reg.last == Some(snapshot) {
                continue;
            }
            reg.last = Some(snapshot);
            records.push(match snapshot {
                Snapshot::Intersection(entry) => ObserverRecord::Intersection { id: reg.id, entry },
                Snapshot::Size(w, h) => ObserverRecord::Resize {
                    id: reg.id,
                    target: reg.target,
                    size: (w, h),
                },
            });
        }
        records
    }
}

/// Intersect `rect` (the geometry of `target`) with `root`.
///
/// A zero-sized target counts as intersecting when its origin lies inside
/// the root, matching how layout engines treat empty boxes.
pub fn intersect(target: NodeId, rect: Rect, root: Rect) -> IntersectionEntry {
    let left = rect.x.max(root.x);
    let top = rect.y.max(root.y);
    let right = rect.right().min(root.right());
    let bottom = rect.bottom().min(root.bottom());

    let overlap = right > left && bottom > top;
    let empty_inside = (rect.width == 0 || rect.height == 0)
        && rect.x >= root.x
        && rect.x <= root.right()
        && rect.y >= root.y
        && rect.y <= root.bottom();

    let intersection_rect = if overlap {
        Rect::new(left, top, right - left, bottom - top)
    } else if empty_inside {
        Rect::new(rect.x, rect.y, 0, 0)
    } else {
        Rect::default()
    };

    IntersectionEntry {
        target,
        intersection_rect,
        root_bounds: root,
        is_intersecting: overlap || empty_inside,
    }
}
