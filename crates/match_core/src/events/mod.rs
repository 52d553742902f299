//! # Event Classification Module
//!
//! Turns the possession timeline into discrete match events.
//!
//! - `possession_change` - Holder-change detection shared by all classifiers
//! - `pass_classifier` - Pass / interception / loose-ball labelling
//! - `final_third` - Final third entries among completed passes
//! - `pass_network` - Pass counts between teammates

pub mod final_third;
pub mod pass_classifier;
pub mod pass_network;
pub mod possession_change;

pub use final_third::{
    final_third_stats, FinalThirdClassification, FinalThirdDetector, FinalThirdPass,
    FinalThirdStats, PlayerFinalThird,
};
pub use pass_classifier::{
    classify, classify_change, ChangeKind, ClassifiedChange, ClassifierDiagnostics,
    PassClassification,
};
pub use pass_network::{pass_network, PassLink, PassNetwork};
pub use possession_change::{possession_changes, PossessionChange, PossessionChanges};
