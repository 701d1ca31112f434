//! Wheel of life and the rating-based burnout assessment

use serde::Serialize;

use super::life_balance::RiskLevel;
use super::round_to;
use crate::models::{LifeArea, LifeAreaType};

/// Areas seeded when none exist: (type, importance, satisfaction)
pub const DEFAULT_WHEEL: &[(LifeAreaType, i32, i32)] = &[
    (LifeAreaType::Work, 8, 6),
    (LifeAreaType::Health, 9, 5),
    (LifeAreaType::Relationships, 8, 7),
    (LifeAreaType::PersonalGrowth, 7, 6),
    (LifeAreaType::Recreation, 6, 4),
    (LifeAreaType::Spirituality, 5, 5),
    (LifeAreaType::Community, 6, 4),
    (LifeAreaType::Finance, 7, 6),
];

/// Highest possible wheel score and burnout score
pub const MAX_SCORE: i32 = 10;

/// Goals created within this many days count toward overload
pub const GOAL_OVERLOAD_WINDOW_DAYS: i64 = 30;
const GOAL_OVERLOAD_LIMIT: i64 = 5;

const LARGE_GAP: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelArea {
    pub id: i64,
    /// Title-cased type
    pub name: String,
    pub importance: i32,
    pub satisfaction: i32,
    /// Importance above satisfaction, never negative
    pub gap: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelOfLife {
    /// Importance-weighted satisfaction, 1 decimal
    pub overall_score: f64,
    pub max_score: i32,
    /// Most important first
    pub areas: Vec<WheelArea>,
}

pub fn wheel_of_life(areas: &[LifeArea]) -> WheelOfLife {
    let total_importance: i32 = areas.iter().map(|a| a.importance).sum();
    let weighted: i32 = areas.iter().map(|a| a.importance * a.satisfaction).sum();
    let overall = if total_importance > 0 {
        weighted as f64 / total_importance as f64
    } else {
        0.0
    };

    let mut wheel_areas: Vec<WheelArea> = areas
        .iter()
        .map(|area| WheelArea {
            id: area.id,
            name: area.area_type.display_name(),
            importance: area.importance,
            satisfaction: area.satisfaction,
            gap: (area.importance - area.satisfaction).max(0),
        })
        .collect();
    wheel_areas.sort_by(|a, b| b.importance.cmp(&a.importance));

    WheelOfLife {
        overall_score: round_to(overall, 1),
        max_score: MAX_SCORE,
        areas: wheel_areas,
    }
}

/// A detected burnout risk factor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskFactor {
    LowWorkSatisfaction,
    HealthConcerns,
    LargeGap(LifeAreaType),
    GoalOverload,
}

impl RiskFactor {
    pub fn weight(&self) -> i32 {
        match self {
            Self::HealthConcerns => 3,
            Self::LowWorkSatisfaction | Self::LargeGap(_) | Self::GoalOverload => 2,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::LowWorkSatisfaction => "Low work satisfaction".to_string(),
            Self::HealthConcerns => "Health concerns".to_string(),
            Self::LargeGap(area) => format!("Large gap in {}", area.display_name()),
            Self::GoalOverload => "Too many active goals (goal overload)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaBurnoutRisk {
    pub risk_level: RiskLevel,
    pub risk_score: i32,
    pub max_score: i32,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Score burnout risk from area ratings and recent goal load
pub fn area_burnout_risk(areas: &[LifeArea], recent_goal_count: i64) -> AreaBurnoutRisk {
    if areas.is_empty() {
        return AreaBurnoutRisk {
            risk_level: RiskLevel::Unknown,
            risk_score: 0,
            max_score: MAX_SCORE,
            factors: Vec::new(),
            recommendations: vec![
                "Please set up your life areas to enable burnout analysis".to_string()
            ],
        };
    }

    let satisfaction_of = |kind: LifeAreaType| {
        areas
            .iter()
            .find(|a| a.area_type == kind)
            .map(|a| a.satisfaction)
    };

    let mut factors = Vec::new();
    if satisfaction_of(LifeAreaType::Work).is_some_and(|s| s <= 4) {
        factors.push(RiskFactor::LowWorkSatisfaction);
    }
    if satisfaction_of(LifeAreaType::Health).is_some_and(|s| s <= 5) {
        factors.push(RiskFactor::HealthConcerns);
    }
    for area in areas {
        if area.importance - area.satisfaction >= LARGE_GAP {
            factors.push(RiskFactor::LargeGap(area.area_type));
        }
    }
    if recent_goal_count > GOAL_OVERLOAD_LIMIT {
        factors.push(RiskFactor::GoalOverload);
    }

    let risk_score: i32 = factors.iter().map(RiskFactor::weight).sum();
    let risk_level = if risk_score >= 8 {
        RiskLevel::High
    } else if risk_score >= 4 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    let mut recommendations = Vec::new();
    if factors.contains(&RiskFactor::LowWorkSatisfaction) {
        recommendations
            .push("Consider discussing workload or work environment with your manager".to_string());
    }
    if factors.contains(&RiskFactor::HealthConcerns) {
        recommendations.push("Prioritize sleep, exercise, and healthy eating habits".to_string());
    }
    if factors.contains(&RiskFactor::GoalOverload) {
        recommendations.push(
            "Consider reducing the number of active goals and prioritizing the most important ones"
                .to_string(),
        );
    }
    if factors.iter().any(|f| matches!(f, RiskFactor::LargeGap(_))) {
        recommendations.push("Focus on areas with the largest satisfaction gaps".to_string());
    }
    recommendations.push("Schedule regular 'me time' for recovery and enjoyment".to_string());
    recommendations.push("Practice mindfulness or relaxation techniques".to_string());

    AreaBurnoutRisk {
        risk_level,
        risk_score,
        max_score: MAX_SCORE,
        factors: factors.iter().map(RiskFactor::describe).collect(),
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(id: i64, area_type: LifeAreaType, importance: i32, satisfaction: i32) -> LifeArea {
        LifeArea {
            id,
            area_type,
            importance,
            satisfaction,
            target_hours_per_week: None,
            notes: None,
        }
    }

    fn default_areas() -> Vec<LifeArea> {
        DEFAULT_WHEEL
            .iter()
            .enumerate()
            .map(|(i, (t, imp, sat))| area(i as i64 + 1, *t, *imp, *sat))
            .collect()
    }

    #[test]
    fn test_wheel_weighted_score_and_order() {
        let wheel = wheel_of_life(&default_areas());

        // (48+45+56+42+24+25+24+42) / 56
        assert_eq!(wheel.overall_score, 5.5);
        assert_eq!(wheel.max_score, 10);
        assert_eq!(wheel.areas[0].name, "Health");
        assert_eq!(wheel.areas[0].gap, 4);
        assert!(wheel.areas.iter().any(|a| a.name == "Personal Growth"));
    }

    #[test]
    fn test_empty_wheel_scores_zero() {
        let wheel = wheel_of_life(&[]);
        assert_eq!(wheel.overall_score, 0.0);
        assert!(wheel.areas.is_empty());
    }

    #[test]
    fn test_burnout_without_areas_is_unknown() {
        let risk = area_burnout_risk(&[], 0);
        assert_eq!(risk.risk_level, RiskLevel::Unknown);
        assert_eq!(
            risk.recommendations,
            vec!["Please set up your life areas to enable burnout analysis"]
        );
    }

    #[test]
    fn test_burnout_factors_from_default_wheel() {
        // Health satisfaction 5 (+3), health gap 4 (+2)
        let risk = area_burnout_risk(&default_areas(), 0);
        assert_eq!(risk.risk_score, 5);
        assert_eq!(risk.risk_level, RiskLevel::Medium);
        assert_eq!(risk.factors, vec!["Health concerns", "Large gap in Health"]);
        assert_eq!(risk.recommendations.len(), 4);
        assert_eq!(
            risk.recommendations.last().map(String::as_str),
            Some("Practice mindfulness or relaxation techniques")
        );
    }

    #[test]
    fn test_goal_overload_is_recommended_against() {
        let areas = vec![area(1, LifeAreaType::Work, 5, 3)];
        let risk = area_burnout_risk(&areas, 6);

        assert_eq!(risk.risk_score, 4);
        assert_eq!(risk.risk_level, RiskLevel::Medium);
        assert!(risk
            .factors
            .contains(&"Too many active goals (goal overload)".to_string()));
        assert!(risk.recommendations.contains(
            &"Consider reducing the number of active goals and prioritizing the most important ones"
                .to_string()
        ));
    }

    #[test]
    fn test_high_risk() {
        let areas = vec![
            area(1, LifeAreaType::Work, 9, 2),
            area(2, LifeAreaType::Health, 9, 3),
        ];
        let risk = area_burnout_risk(&areas, 0);
        // 2 + 3 + 2 + 2
        assert_eq!(risk.risk_score, 9);
        assert_eq!(risk.risk_level, RiskLevel::High);
    }
}
