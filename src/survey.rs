// src/survey.rs
//! Пакетная генерация по множеству сидов и сводная статистика
//!
//! Позволяет проверить, что распределение особых комнат соответствует весам.
//! С фичей `parallel` сиды обрабатываются через rayon.

use crate::dungeon::generate_dungeon;
use crate::error::GenerationError;
use crate::room_type::RoomTypeRegistry;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct SurveySettings {
    pub size: usize,
    pub seeds: Range<u64>,
    pub max_rejections: usize,
}

/// Итоги одного прогона
#[derive(Debug, Clone, Default)]
struct RunStats {
    rooms: usize,
    counts: BTreeMap<String, u64>,
    exit_distance: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurveyReport {
    pub runs: usize,
    pub total_rooms: usize,
    /// Суммарное число назначений каждого особого типа
    pub counts: BTreeMap<String, u64>,
    pub mean_exit_distance: f64,
}

impl SurveyReport {
    /// Доля типа среди всех назначенных особых комнат
    #[must_use]
    pub fn share(&self, name: &str) -> f64 {
        let total: u64 = self.counts.values().sum();
        if total == 0 {
            return 0.0;
        }
        self.counts.get(name).copied().unwrap_or(0) as f64 / total as f64
    }
}

fn run_one(
    registry: &RoomTypeRegistry,
    settings: &SurveySettings,
    seed: u64,
) -> Result<RunStats, GenerationError> {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    let dungeon = generate_dungeon(registry, settings.size, settings.max_rejections, &mut rng)?;

    let counts = dungeon
        .occurrences()
        .iter()
        .map(|(id, n)| (registry.get(id).name.clone(), u64::from(n)))
        .collect();
    Ok(RunStats {
        rooms: dungeon.len(),
        counts,
        exit_distance: dungeon.exit().map_or(0, |r| r.distance),
    })
}

/// Генерирует по подземелью на каждый сид и суммирует статистику.
/// Первая же ошибка генерации прерывает обзор.
pub fn survey(
    registry: &RoomTypeRegistry,
    settings: &SurveySettings,
) -> Result<SurveyReport, GenerationError> {
    #[cfg(feature = "parallel")]
    let runs: Vec<RunStats> = settings
        .seeds
        .clone()
        .into_par_iter()
        .map(|seed| run_one(registry, settings, seed))
        .collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let runs: Vec<RunStats> = settings
        .seeds
        .clone()
        .map(|seed| run_one(registry, settings, seed))
        .collect::<Result<_, _>>()?;

    let mut report = SurveyReport {
        runs: runs.len(),
        ..SurveyReport::default()
    };
    let mut exit_total = 0u64;
    for run in runs {
        report.total_rooms += run.rooms;
        exit_total += u64::from(run.exit_distance);
        for (name, n) in run.counts {
            *report.counts.entry(name).or_insert(0) += n;
        }
    }
    if report.runs > 0 {
        report.mean_exit_distance = exit_total as f64 / report.runs as f64;
    }

    log::info!(
        "survey finished: {} runs, {} rooms total",
        report.runs,
        report.total_rooms
    );
    Ok(report)
}
