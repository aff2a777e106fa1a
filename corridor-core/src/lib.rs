//! Pollinator corridor network analysis.
//!
//! Given a snapshot of registered gardens and a pollinator category, the
//! analyzer links every pair of gardens within the category's flight range,
//! classifies each garden as isolated, connected or a hub, proposes gap zones
//! where a new garden would reconnect isolated ones, and summarises the
//! network. Start with [`AnalyzerBuilder`]; the individual stages are exposed
//! for callers that need only part of the pipeline.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod analyzer;
mod builder;
mod cache;
mod classify;
mod distance;
mod error;
mod gaps;
mod garden;
mod graph;
mod species;
mod stats;
mod union_find;

#[cfg(feature = "parallel")]
pub use crate::graph::PARALLEL_THRESHOLD;
pub use crate::{
    analyzer::{Analyzer, NetworkAnalysis},
    builder::AnalyzerBuilder,
    cache::{
        AnalysisCache, AnalysisTicket, DEFAULT_CACHE_CAPACITY, GardenSetFingerprint,
        LatestAnalysis,
    },
    classify::{Classifications, DEFAULT_HUB_THRESHOLD, NodeClassification, NodeRole, classify},
    distance::{
        DEFAULT_LAT_KM_PER_DEGREE, DEFAULT_LNG_KM_PER_DEGREE, DistanceModel, EARTH_RADIUS_KM,
        PlanarScale, REFERENCE_BAND_DEGREES, haversine_km, planar_km,
    },
    error::{
        AnalysisError, AnalysisErrorCode, ConfigError, ConfigErrorCode, GardenError,
        GardenErrorCode, Result,
    },
    gaps::{GapSearch, GapZone, find_gaps},
    garden::{Coordinates, Garden},
    graph::{
        Connection, GRID_THRESHOLD, GraphSettings, PairStrategy, StrengthModel, build_graph,
    },
    species::{CorridorStyle, SpeciesKind, SpeciesProfile, SpeciesRegistry},
    stats::{NetworkStatistics, aggregate},
};
