//! Scene graph adapter
//!
//! The editor never talks to a rendering library directly. It owns a
//! `SceneGraph` holding plain `VisualObject` records, each tagged with a
//! `VisualKind`, and asks for render passes explicitly. The draw layer reads
//! the retained scene when a pass is pending.

use crate::core::settings::{HIT_SLOP, MARKER_RADIUS};
use crate::data::model::{MarcherId, PageId};
use kurbo::Point;

pub type ObjectId = u64;

/// Straight alpha color, decoupled from any rendering crate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Tint {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

pub const LIVE_MARKER_TINT: Tint = Tint::rgba(0.95, 0.95, 0.95, 1.0);
pub const UNKNOWN_MARKER_TINT: Tint = Tint::rgba(0.95, 0.35, 0.25, 1.0);
pub const PREVIOUS_PAGE_TINT: Tint = Tint::rgba(0.35, 0.65, 1.0, 0.5);
pub const NEXT_PAGE_TINT: Tint = Tint::rgba(0.35, 1.0, 0.55, 0.5);

#[derive(Debug, Clone, PartialEq)]
pub enum VisualKind {
    /// The live, draggable proxy for a marcher on the selected page
    Marcher { marcher_id: MarcherId },
    /// Placeholder for a marcher with no position on the selected page
    Unknown { marcher_id: MarcherId },
    /// Non-interactive preview of a marcher on another page
    Ghost {
        marcher_id: MarcherId,
        page_id: PageId,
    },
    /// Segment from the object's location to `end`
    Pathway { marcher_id: MarcherId, end: Point },
}

impl VisualKind {
    /// Whether the user can pick, select and drag this object
    pub fn is_interactive(&self) -> bool {
        match self {
            VisualKind::Marcher { .. } => true,
            VisualKind::Unknown { .. }
            | VisualKind::Ghost { .. }
            | VisualKind::Pathway { .. } => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualObject {
    pub id: ObjectId,
    pub kind: VisualKind,
    pub position: Point,
    pub label: String,
    pub tint: Tint,
    pub selected: bool,
    pub lock_x: bool,
    pub lock_y: bool,
}

impl VisualObject {
    /// A new object; the scene assigns the id on `add`
    pub fn new(kind: VisualKind, position: Point, label: String, tint: Tint) -> Self {
        Self {
            id: 0,
            kind,
            position,
            label,
            tint,
            selected: false,
            lock_x: false,
            lock_y: false,
        }
    }
}

/// How the scene currently represents the active selection
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveSelection {
    #[default]
    None,
    Single(ObjectId),
    /// A group transformed as one unit
    Composite(Vec<ObjectId>),
}

impl ActiveSelection {
    pub fn ids(&self) -> Vec<ObjectId> {
        match self {
            ActiveSelection::None => Vec::new(),
            ActiveSelection::Single(id) => vec![*id],
            ActiveSelection::Composite(ids) => ids.clone(),
        }
    }
}

pub trait SceneGraph: Send + Sync {
    /// Inserts on top of the z-order and returns the assigned id
    fn add(&mut self, object: VisualObject) -> ObjectId;

    fn remove(&mut self, id: ObjectId) -> Option<VisualObject>;

    fn bring_to_front(&mut self, id: ObjectId);

    /// Returns false when the object does not exist
    fn set_coordinates(&mut self, id: ObjectId, position: Point) -> bool;

    /// Topmost interactive object under `point`
    fn hit_test(&self, point: Point) -> Option<ObjectId>;

    fn active_objects(&self) -> &ActiveSelection;

    fn set_active_objects(&mut self, selection: ActiveSelection);

    fn get(&self, id: ObjectId) -> Option<&VisualObject>;

    fn get_mut(&mut self, id: ObjectId) -> Option<&mut VisualObject>;

    /// Objects back to front
    fn objects(&self) -> Vec<&VisualObject>;

    fn request_render(&mut self);

    /// Clears and returns the pending render request
    fn take_render_request(&mut self) -> bool;
}

/// Scene graph kept entirely in memory
#[derive(Debug, Default)]
pub struct RetainedScene {
    /// Back to front
    objects: Vec<VisualObject>,
    next_id: ObjectId,
    active: ActiveSelection,
    render_pending: bool,
    /// Number of coordinate writes, each one invalidates cached render state
    invalidations: u64,
}

impl RetainedScene {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn invalidations(&self) -> u64 {
        self.invalidations
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|object| object.id == id)
    }
}

impl SceneGraph for RetainedScene {
    fn add(&mut self, mut object: VisualObject) -> ObjectId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        object.id = id;
        self.objects.push(object);
        id
    }

    fn remove(&mut self, id: ObjectId) -> Option<VisualObject> {
        let index = self.index_of(id)?;
        let mut ids = self.active.ids();
        if ids.contains(&id) {
            ids.retain(|active| *active != id);
            self.active = match ids.len() {
                0 => ActiveSelection::None,
                1 => ActiveSelection::Single(ids[0]),
                _ => ActiveSelection::Composite(ids),
            };
        }
        Some(self.objects.remove(index))
    }

    fn bring_to_front(&mut self, id: ObjectId) {
        if let Some(index) = self.index_of(id) {
            let object = self.objects.remove(index);
            self.objects.push(object);
        }
    }

    fn set_coordinates(&mut self, id: ObjectId, position: Point) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.objects[index].position = position;
                self.invalidations += 1;
                true
            }
            None => false,
        }
    }

    fn hit_test(&self, point: Point) -> Option<ObjectId> {
        let reach = MARKER_RADIUS + HIT_SLOP;
        self.objects
            .iter()
            .rev()
            .filter(|object| object.kind.is_interactive())
            .find(|object| object.position.distance(point) <= reach)
            .map(|object| object.id)
    }

    fn active_objects(&self) -> &ActiveSelection {
        &self.active
    }

    fn set_active_objects(&mut self, selection: ActiveSelection) {
        self.active = selection;
    }

    fn get(&self, id: ObjectId) -> Option<&VisualObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    fn get_mut(&mut self, id: ObjectId) -> Option<&mut VisualObject> {
        self.objects.iter_mut().find(|object| object.id == id)
    }

    fn objects(&self) -> Vec<&VisualObject> {
        self.objects.iter().collect()
    }

    fn request_render(&mut self) {
        self.render_pending = true;
    }

    fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_pending)
    }
}
