//! Canonical problem vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::WardError;

/// A clinical condition selectable from the ward's fixed problem list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemTag {
    /// 妊娠糖尿病
    GestationalDiabetes,
    /// 妊娠高血圧症候群
    HypertensiveDisorder,
    /// 前置胎盤
    PlacentaPrevia,
    /// 切迫早産
    ThreatenedPretermLabor,
    /// 多胎妊娠
    MultiplePregnancy,
    /// 前期破水
    PrematureRupture,
    /// 胎児発育不全
    FetalGrowthRestriction,
    /// 羊水過多
    Polyhydramnios,
    /// 羊水過少
    Oligohydramnios,
    /// 常位胎盤早期剥離
    PlacentalAbruption,
    /// 子宮内胎児死亡
    IntrauterineFetalDeath,
    /// 帝王切開既往
    PriorCesarean,
}

impl ProblemTag {
    /// The vocabulary in the order it is offered for selection.
    pub const ALL: [ProblemTag; 12] = [
        ProblemTag::GestationalDiabetes,
        ProblemTag::HypertensiveDisorder,
        ProblemTag::PlacentaPrevia,
        ProblemTag::ThreatenedPretermLabor,
        ProblemTag::MultiplePregnancy,
        ProblemTag::PrematureRupture,
        ProblemTag::FetalGrowthRestriction,
        ProblemTag::Polyhydramnios,
        ProblemTag::Oligohydramnios,
        ProblemTag::PlacentalAbruption,
        ProblemTag::IntrauterineFetalDeath,
        ProblemTag::PriorCesarean,
    ];

    /// Display label used on the board and in stored records.
    pub fn label(self) -> &'static str {
        match self {
            ProblemTag::GestationalDiabetes => "妊娠糖尿病",
            ProblemTag::HypertensiveDisorder => "妊娠高血圧症候群",
            ProblemTag::PlacentaPrevia => "前置胎盤",
            ProblemTag::ThreatenedPretermLabor => "切迫早産",
            ProblemTag::MultiplePregnancy => "多胎妊娠",
            ProblemTag::PrematureRupture => "前期破水",
            ProblemTag::FetalGrowthRestriction => "胎児発育不全",
            ProblemTag::Polyhydramnios => "羊水過多",
            ProblemTag::Oligohydramnios => "羊水過少",
            ProblemTag::PlacentalAbruption => "常位胎盤早期剥離",
            ProblemTag::IntrauterineFetalDeath => "子宮内胎児死亡",
            ProblemTag::PriorCesarean => "帝王切開既往",
        }
    }
}

impl fmt::Display for ProblemTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProblemTag {
    type Err = WardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        ProblemTag::ALL
            .into_iter()
            .find(|tag| tag.label() == label)
            .ok_or_else(|| WardError::NotFound(format!("problem tag '{}'", label)))
    }
}

impl Serialize for ProblemTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ProblemTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}
