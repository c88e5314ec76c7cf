//! Teleport pads and the validated pad set
//!
//! Pairing is checked once, when the set is built, so the simulation can
//! assume every target resolves and every pairing is mutual.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique pad identifier ("A", "B", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PadId(pub String);

impl PadId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PadId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for PadId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cosmetic color shared by both ends of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PadColor {
    #[default]
    Cyan,
    Purple,
    Pink,
    Gold,
}

impl PadColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PadColor::Cyan => "cyan",
            PadColor::Purple => "purple",
            PadColor::Pink => "pink",
            PadColor::Gold => "gold",
        }
    }
}

/// A fixed teleport endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub id: PadId,
    /// Top-left corner in arena coordinates
    pub position: Vec2,
    pub target_id: PadId,
    pub color: PadColor,
    /// Pair label ("α"), shared by both ends
    pub label: String,
    #[serde(default)]
    pub locked: bool,
    /// Total teleports needed before the pair may be unlocked
    #[serde(default)]
    pub unlock_cost: Option<u32>,
}

impl Pad {
    pub fn new(id: &str, x: f32, y: f32, target: &str, color: PadColor, label: &str) -> Self {
        Self {
            id: id.into(),
            position: Vec2::new(x, y),
            target_id: target.into(),
            color,
            label: label.to_string(),
            locked: false,
            unlock_cost: None,
        }
    }

    /// Start locked, unlockable after `cost` total teleports
    pub fn gated(mut self, cost: u32) -> Self {
        self.locked = true;
        self.unlock_cost = Some(cost);
        self
    }

    pub fn center(&self, pad_size: f32) -> Vec2 {
        crate::square_center(self.position, pad_size)
    }
}

/// Data-integrity violations in a pad layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PadSetError {
    #[error("pad set is empty")]
    Empty,
    #[error("duplicate pad id {0}")]
    DuplicateId(PadId),
    #[error("pad {pad} targets unknown pad {target}")]
    UnknownTarget { pad: PadId, target: PadId },
    #[error("pad {0} targets itself")]
    SelfTarget(PadId),
    #[error("pad {pad} targets {target}, but {target} targets {back}")]
    NotMutual { pad: PadId, target: PadId, back: PadId },
    #[error("paired pads {pad} and {target} have different labels")]
    LabelMismatch { pad: PadId, target: PadId },
}

/// Ordered, validated collection of pads. Iteration order is insertion order
/// and is the order the trigger scan uses.
#[derive(Debug, Clone, Serialize)]
pub struct PadSet {
    pads: Vec<Pad>,
    #[serde(skip)]
    index: HashMap<PadId, usize>,
}

impl PadSet {
    pub fn new(pads: Vec<Pad>) -> Result<Self, PadSetError> {
        if pads.is_empty() {
            return Err(PadSetError::Empty);
        }

        let mut index = HashMap::with_capacity(pads.len());
        for (i, pad) in pads.iter().enumerate() {
            if index.insert(pad.id.clone(), i).is_some() {
                return Err(PadSetError::DuplicateId(pad.id.clone()));
            }
        }

        // every target must resolve before pairings are compared
        for pad in &pads {
            if pad.target_id == pad.id {
                return Err(PadSetError::SelfTarget(pad.id.clone()));
            }
            if !index.contains_key(&pad.target_id) {
                return Err(PadSetError::UnknownTarget {
                    pad: pad.id.clone(),
                    target: pad.target_id.clone(),
                });
            }
        }

        for pad in &pads {
            let target = &pads[index[&pad.target_id]];
            if target.target_id != pad.id {
                return Err(PadSetError::NotMutual {
                    pad: pad.id.clone(),
                    target: target.id.clone(),
                    back: target.target_id.clone(),
                });
            }
            if target.label != pad.label {
                return Err(PadSetError::LabelMismatch {
                    pad: pad.id.clone(),
                    target: target.id.clone(),
                });
            }
        }

        Ok(Self { pads, index })
    }

    /// The stock layout: three open pairs and a gold pair behind an unlock
    pub fn default_layout() -> Self {
        use PadColor::*;
        let pads = vec![
            Pad::new("A", 80.0, 80.0, "B", Cyan, "α"),
            Pad::new("B", 680.0, 380.0, "A", Cyan, "α"),
            Pad::new("C", 680.0, 80.0, "D", Purple, "β"),
            Pad::new("D", 80.0, 380.0, "C", Purple, "β"),
            Pad::new("E", 380.0, 230.0, "F", Pink, "γ"),
            Pad::new("F", 380.0, 420.0, "E", Pink, "γ"),
            Pad::new("G", 230.0, 155.0, "H", Gold, "δ").gated(10),
            Pad::new("H", 530.0, 305.0, "G", Gold, "δ").gated(10),
        ];
        match Self::new(pads) {
            Ok(set) => set,
            Err(e) => unreachable!("default layout is valid: {e}"),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Pad> {
        self.index.get(id).map(|&i| &self.pads[i])
    }

    /// The other end of a pad's pair
    pub fn target_of(&self, pad: &Pad) -> Option<&Pad> {
        self.get(pad.target_id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pad> {
        self.pads.iter()
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    /// Each pair once, first end in set order
    pub fn pairs(&self) -> Vec<(&Pad, &Pad)> {
        self.pads
            .iter()
            .enumerate()
            .filter_map(|(i, pad)| {
                let t = self.index[&pad.target_id];
                (i < t).then(|| (pad, &self.pads[t]))
            })
            .collect()
    }

    /// Pads carrying a pair label
    pub fn with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Pad> + 'a {
        self.pads.iter().filter(move |p| p.label == label)
    }

    /// Unlock every pad with `label`. Returns how many pads changed.
    pub(crate) fn unlock_label(&mut self, label: &str) -> usize {
        let mut changed = 0;
        for pad in self.pads.iter_mut().filter(|p| p.label == label) {
            if pad.locked {
                pad.locked = false;
                changed += 1;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PadColor::*;

    #[test]
    fn test_default_layout_is_symmetric() {
        let set = PadSet::default_layout();
        for pad in set.iter() {
            let target = set.target_of(pad).unwrap();
            assert_eq!(target.target_id, pad.id);
            assert_eq!(target.label, pad.label);
        }
        assert_eq!(set.pairs().len(), 4);
    }

    #[test]
    fn test_default_layout_gates_delta() {
        let set = PadSet::default_layout();
        let deltas: Vec<_> = set.with_label("δ").collect();
        assert_eq!(deltas.len(), 2);
        assert!(deltas.iter().all(|p| p.locked && p.unlock_cost == Some(10)));
        assert!(!set.get("A").unwrap().locked);
    }

    #[test]
    fn test_rejects_unknown_target() {
        let err = PadSet::new(vec![
            Pad::new("A", 0.0, 0.0, "B", Cyan, "α"),
            Pad::new("B", 10.0, 0.0, "Z", Cyan, "α"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            PadSetError::UnknownTarget {
                pad: "B".into(),
                target: "Z".into()
            }
        );
    }

    #[test]
    fn test_unknown_target_reported_before_pairing() {
        // C would fail the pairing check first if targets were not resolved up front
        let err = PadSet::new(vec![
            Pad::new("C", 0.0, 0.0, "D", Purple, "β"),
            Pad::new("D", 10.0, 0.0, "X", Purple, "β"),
            Pad::new("E", 20.0, 0.0, "F", Pink, "γ"),
            Pad::new("F", 30.0, 0.0, "E", Pink, "γ"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            PadSetError::UnknownTarget {
                pad: "D".into(),
                target: "X".into()
            }
        );
    }

    #[test]
    fn test_pairs_list_each_pair_once() {
        let set = PadSet::default_layout();
        let ids: Vec<_> = set
            .pairs()
            .iter()
            .map(|(a, b)| (a.id.as_str(), b.id.as_str()))
            .collect();
        assert_eq!(ids, vec![("A", "B"), ("C", "D"), ("E", "F"), ("G", "H")]);
    }

    #[test]
    fn test_rejects_self_target() {
        let err = PadSet::new(vec![Pad::new("A", 0.0, 0.0, "A", Cyan, "α")]).unwrap_err();
        assert_eq!(err, PadSetError::SelfTarget("A".into()));
    }

    #[test]
    fn test_rejects_one_way_pairing() {
        let err = PadSet::new(vec![
            Pad::new("A", 0.0, 0.0, "B", Cyan, "α"),
            Pad::new("B", 10.0, 0.0, "C", Cyan, "α"),
            Pad::new("C", 20.0, 0.0, "B", Cyan, "α"),
        ])
        .unwrap_err();
        assert!(matches!(err, PadSetError::NotMutual { .. }));
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        assert_eq!(PadSet::new(Vec::new()).unwrap_err(), PadSetError::Empty);
        let err = PadSet::new(vec![
            Pad::new("A", 0.0, 0.0, "B", Cyan, "α"),
            Pad::new("A", 10.0, 0.0, "B", Cyan, "α"),
        ])
        .unwrap_err();
        assert_eq!(err, PadSetError::DuplicateId("A".into()));
    }

    #[test]
    fn test_rejects_label_mismatch() {
        let err = PadSet::new(vec![
            Pad::new("A", 0.0, 0.0, "B", Cyan, "α"),
            Pad::new("B", 10.0, 0.0, "A", Cyan, "β"),
        ])
        .unwrap_err();
        assert!(matches!(err, PadSetError::LabelMismatch { .. }));
    }

    #[test]
    fn test_unlock_label_counts_changes() {
        let mut set = PadSet::default_layout();
        assert_eq!(set.unlock_label("δ"), 2);
        assert_eq!(set.unlock_label("δ"), 0);
        assert!(set.with_label("δ").all(|p| !p.locked));
    }

    #[test]
    fn test_pad_center() {
        let pad = Pad::new("A", 80.0, 80.0, "B", Cyan, "α");
        assert_eq!(pad.center(50.0), Vec2::new(105.0, 105.0));
    }
}
