//! Requested block-state properties for a placement and their resolution
//! against a block type's declared properties.

use tactile_world::{BlockDescriptor, Face, StateId};

/// Vertical half a slab-like block is placed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    /// Picks the half from the clicked face and the vertical cursor fraction.
    ///
    /// Clicking the underside always yields `Top`, clicking the top always
    /// yields `Bottom`; side faces split at the middle of the block.
    pub fn select(face: Face, cursor_y: f64) -> Half {
        match face {
            Face::Down => Half::Top,
            Face::Up => Half::Bottom,
            _ if cursor_y > 0.5 => Half::Top,
            _ => Half::Bottom,
        }
    }

    /// State property value.
    pub fn as_str(self) -> &'static str {
        match self {
            Half::Top => "top",
            Half::Bottom => "bottom",
        }
    }
}

/// A requested override for one property name, applied only when the block's
/// property supports every value in `candidates`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyRequest {
    /// Property name the request applies to.
    pub property: &'static str,
    /// Value set the property must fully support.
    pub candidates: &'static [&'static str],
    /// Requested value.
    pub value: &'static str,
}

const SLAB_TYPES: &[&str] = &["bottom", "top", "double"];
const HALVES: &[&str] = &["top", "bottom"];
const AXES: &[&str] = &["x", "y", "z"];
const FACINGS: &[&str] = &["north", "south", "west", "east", "up", "down"];

/// Property requests implied by clicking `face` at vertical cursor fraction `cursor_y`.
pub fn placement_requests(face: Face, cursor_y: f64) -> [PropertyRequest; 4] {
    let half = Half::select(face, cursor_y).as_str();
    [
        PropertyRequest {
            property: "type",
            candidates: SLAB_TYPES,
            value: half,
        },
        PropertyRequest {
            property: "half",
            candidates: HALVES,
            value: half,
        },
        PropertyRequest {
            property: "axis",
            candidates: AXES,
            value: face.axis().as_str(),
        },
        PropertyRequest {
            property: "facing",
            candidates: FACINGS,
            value: face.facing_label(),
        },
    ]
}

/// Resolves the final state of `desc` starting from its default state.
///
/// Each declared property takes the first compatible request's value, else
/// keeps the default state's value.
pub fn resolve_state(desc: &BlockDescriptor, requests: &[PropertyRequest]) -> Option<StateId> {
    let defaults = desc.decode(desc.default_state)?;
    let values: Vec<&str> = desc
        .properties
        .iter()
        .zip(defaults)
        .map(|(prop, default)| {
            requests
                .iter()
                .find(|r| r.property == prop.name && prop.supports_all(r.candidates))
                .map_or(default, |r| r.value)
        })
        .collect();
    desc.encode(&values)
}
