//! Static sound library: the closed vocabularies the classifier may answer with.
//!
//! Ambience tracks loop in the background, one at a time. Effects are short
//! one-shot clips. The two vocabularies are disjoint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackId {
    ConteFees,
    Foret,
    Mer,
    Nuit,
    Pluie,
    Orage,
    Cheminee,
    Marais,
    Riviere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectId {
    Tonnerre,
    Craquements,
    Cloches,
    Mouettes,
    SonsMagiques,
    VentFort,
    VentForet,
}

/// A looping ambience track.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDef {
    pub id: TrackId,
    pub label: &'static str,
    pub file_ref: &'static str,
    /// Nominal playback volume, 0.0 - 1.0, before the master volume is applied.
    pub volume: f32,
}

/// A one-shot effect clip.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectDef {
    pub id: EffectId,
    pub label: &'static str,
    pub file_ref: &'static str,
    pub volume: f32,
}

pub const TRACKS: [TrackDef; 9] = [
    TrackDef { id: TrackId::ConteFees, label: "Conte de fées", file_ref: "sounds/conte-fees.mp3", volume: 0.5 },
    TrackDef { id: TrackId::Foret, label: "Forêt", file_ref: "sounds/oiseaux.mp3", volume: 0.6 },
    TrackDef { id: TrackId::Mer, label: "Bord de mer", file_ref: "sounds/vagues.mp3", volume: 0.6 },
    TrackDef { id: TrackId::Nuit, label: "Nuit", file_ref: "sounds/grillons.mp3", volume: 0.5 },
    TrackDef { id: TrackId::Pluie, label: "Pluie", file_ref: "sounds/pluie-douce.mp3", volume: 0.5 },
    TrackDef { id: TrackId::Orage, label: "Orage", file_ref: "sounds/pluie-forte.mp3", volume: 0.6 },
    TrackDef { id: TrackId::Cheminee, label: "Cheminée", file_ref: "sounds/feu-cheminee.mp3", volume: 0.5 },
    TrackDef { id: TrackId::Marais, label: "Marais", file_ref: "sounds/grenouilles.mp3", volume: 0.4 },
    TrackDef { id: TrackId::Riviere, label: "Rivière", file_ref: "sounds/riviere.mp3", volume: 0.5 },
];

pub const EFFECTS: [EffectDef; 7] = [
    EffectDef { id: EffectId::Tonnerre, label: "Tonnerre", file_ref: "sounds/tonnerre.mp3", volume: 0.8 },
    EffectDef { id: EffectId::Craquements, label: "Craquements", file_ref: "sounds/craquements.mp3", volume: 0.7 },
    EffectDef { id: EffectId::Cloches, label: "Cloches", file_ref: "sounds/cloches.mp3", volume: 0.5 },
    EffectDef { id: EffectId::Mouettes, label: "Mouettes", file_ref: "sounds/mouettes.mp3", volume: 0.5 },
    EffectDef { id: EffectId::SonsMagiques, label: "Magie", file_ref: "sounds/sons-magiques.mp3", volume: 0.6 },
    EffectDef { id: EffectId::VentFort, label: "Vent fort", file_ref: "sounds/vent-fort.mp3", volume: 0.5 },
    EffectDef { id: EffectId::VentForet, label: "Vent forêt", file_ref: "sounds/vent-foret.mp3", volume: 0.4 },
];

impl TrackId {
    pub const ALL: [TrackId; 9] = [
        TrackId::ConteFees,
        TrackId::Foret,
        TrackId::Mer,
        TrackId::Nuit,
        TrackId::Pluie,
        TrackId::Orage,
        TrackId::Cheminee,
        TrackId::Marais,
        TrackId::Riviere,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrackId::ConteFees => "conte-fees",
            TrackId::Foret => "foret",
            TrackId::Mer => "mer",
            TrackId::Nuit => "nuit",
            TrackId::Pluie => "pluie",
            TrackId::Orage => "orage",
            TrackId::Cheminee => "cheminee",
            TrackId::Marais => "marais",
            TrackId::Riviere => "riviere",
        }
    }

    pub fn def(self) -> &'static TrackDef {
        // TRACKS is declared in enum order.
        &TRACKS[self as usize]
    }
}

impl EffectId {
    pub const ALL: [EffectId; 7] = [
        EffectId::Tonnerre,
        EffectId::Craquements,
        EffectId::Cloches,
        EffectId::Mouettes,
        EffectId::SonsMagiques,
        EffectId::VentFort,
        EffectId::VentForet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EffectId::Tonnerre => "tonnerre",
            EffectId::Craquements => "craquements",
            EffectId::Cloches => "cloches",
            EffectId::Mouettes => "mouettes",
            EffectId::SonsMagiques => "sons-magiques",
            EffectId::VentFort => "vent-fort",
            EffectId::VentForet => "vent-foret",
        }
    }

    pub fn def(self) -> &'static EffectDef {
        &EFFECTS[self as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not in the sound library")]
pub struct UnknownLabel(pub String);

impl FromStr for TrackId {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrackId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl FromStr for EffectId {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
