use std::collections::HashMap;

/// A named group of statistics nested together in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

/// Immutable mapping of category name to the CSV columns it groups.
///
/// A column belongs to at most one category: if a column were listed under
/// several categories, the first one keeps it.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
    owners: HashMap<&'static str, usize>,
}

impl CategoryTable {
    pub fn new(categories: &[(&'static str, &'static [&'static str])]) -> Self {
        let categories: Vec<Category> = categories
            .iter()
            .map(|&(name, fields)| Category { name, fields })
            .collect();

        let mut owners = HashMap::new();
        for (index, category) in categories.iter().enumerate() {
            for field in category.fields {
                owners.entry(*field).or_insert(index);
            }
        }

        Self { categories, owners }
    }

    /// The grouping used for the fighter statistics export.
    pub fn fighter_stats() -> Self {
        Self::new(FIGHTER_STAT_CATEGORIES)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category owning `field`, if any.
    pub fn category_of(&self, field: &str) -> Option<&Category> {
        self.owners
            .get(field)
            .map(|index| &self.categories[*index])
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.owners.contains_key(field)
    }

    /// Whether `field` is owned by `category`, as opposed to merely listed in it.
    pub(crate) fn owns(&self, category: &Category, field: &str) -> bool {
        self.category_of(field)
            .is_some_and(|owner| owner.name == category.name)
    }
}

#[rustfmt::skip]
const FIGHTER_STAT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "submission_stats",
        &[
            "AmericanaAttempts", "AmericanaLosses", "AmericanaWins", "AnacondaAttempt",
            "AnacondaLoss", "AnacondaWin", "BulldogAttempt", "BulldogLoss", "BulldogWin",
            "CalfSlicerAttempts", "CalfSlicerLosses", "CalfSlicerWins", "EzekielAttempt",
            "EzekielLoss", "EzekielWin", "GogoplataAttempts", "GogoplataLosses", "GogoplataWins",
            "KneebarAttempt", "KneebarLoss", "KneebarWin", "LeglockAttempt", "LeglockLoss",
            "LeglockWin", "NeckCrankAttempt", "OmoplataAttempt", "OmoplataAttempts",
            "OmoplataLoss", "OmoplataLosses", "OmoplataWin", "OmoplataWins", "OtherSubAttempt",
            "OtherSubLoss", "OtherSubWin", "SUBRNCAttempt", "SUBRNCLoss", "SUBRNCWin",
            "SubArmTriangleAttempt", "SubArmTriangleLoss", "SubArmTriangleWin", "SubAttempts",
            "SubDarceAttempt", "SubDarceLoss", "SubDarceWin", "SubGuillotineAttempt",
            "SubGuillotineLoss", "SubGuillotineWin", "SubHeelHookAttempt", "SubHeelHookLoss",
            "SubHeelHookWin", "SubKimuraAttempt", "SubKimuraLoss", "SubKimuraWin",
            "SubNeckCrankAttempt", "SubNeckCrankWin", "SubStraightArmLockAttempt",
            "SubStraightArmLockLoss", "SubStraightArmLockWin", "SubSulovStretchAttempt",
            "SubSulovStretchLoss", "SubSulovStretchWin", "SubTriangleArmbarAttempt",
            "SubTriangleArmbarLoss", "SubTriangleArmbarWin", "SubTriangleAttempt",
            "SubTriangleLoss", "SubTriangleWin", "TwisterAttempts", "TwisterLosses", "TwisterWins",
            "VonFlueAttempt", "VonFlueLoss", "VonFlueWin",
        ],
    ),
    (
        "takedown_stats",
        &[
            "AnklePickDefends", "AttemptedAnklePickTD", "FailedAnklePickTD",
            "SuccessfulAnklePickTD", "AttemptedImanariTD", "FailedImanariTD", "ImanariDefends",
            "SuccessfulImanariTD", "AttemptedThrowTD", "FailedThrowTD", "SuccessfulThrowTD",
            "BodyLockDefends", "BodyLockTakedownAttempts", "BodyLockTakedownFail",
            "BodyLockTakedownSuccess", "DoubleLegDefends", "DoubleLegTakedownAttempts",
            "DoubleLegTakedownFail", "DoubleLegTakedownSuccess", "SingleLegDefends",
            "SingleLegTakedownAttempts", "SingleLegTakedownFail", "SingleLegTakedownSuccess",
            "TripDefends", "TripTakedownAttempts", "TripTakedownFail", "TripTakedownSuccess",
            "ThrowDefends", "TakedownsAA",
        ],
    ),
    (
        "striking_stats",
        &[
            "BodyKicksAA", "BodyKicksAbsorbed", "HeadKicksAA", "HeadKicksAbsorbed", "CrossesAA",
            "CrossesAbsorbed", "HooksAA", "HooksAbsorbed", "JabsAA", "JabsAbsorbed", "StraightsAA",
            "StraightsAbsorbed", "UppercutsAA", "UppercutsAbsorbed", "LegKicksAA",
            "LegKicksAbsorbed", "OverhandsAbsorbed", "KnockdownsAA", "StunsAA", "TimesStunnedAA",
        ],
    ),
    (
        "clinch_stats",
        &[
            "BeingClinched", "InClinch", "ClinchStrikeHiMake", "ClinchStrikeHiMiss",
            "ClinchStrikeLoMake", "ClinchStrikeLoMiss", "TotalClinchStrikesMade",
            "TotalClinchStrikesMissed", "TotalClinchStrikesThrown",
        ],
    ),
    (
        "ground_stats",
        &[
            "GroundStrikeHiMake", "GroundStrikeHiMiss", "GroundStrikeLoMake", "GroundStrikeLoMiss",
            "OnBottomGround", "OnTopGround", "TotalGroundStrikesMade", "TotalGroundStrikesMissed",
            "TotalGroundStrikesThrown",
        ],
    ),
    (
        "left_hand_stats",
        &[
            "LeftBodyKickMake", "LeftBodyKickMiss", "LeftCrossAttempts", "LeftCrossMake",
            "LeftCrossMissed", "LeftElbowMake", "LeftElbowMiss", "LeftHighKickMake",
            "LeftHighKickMiss", "LeftHookHiMake", "LeftHookHiMiss", "LeftHookLoMake",
            "LeftHookLoMiss", "LeftJabHiMake", "LeftJabHiMiss", "LeftJabLoMake", "LeftJabLoMiss",
            "LeftLegKickMake", "LeftLegKickMiss", "LeftOverhandMake", "LeftOverhandMiss",
            "LeftSpinBackFistMake", "LeftSpinBackFistMiss", "LeftStraightHiMake",
            "LeftStraightHiMiss", "LeftStraightLoMake", "LeftStraightLoMiss", "LeftUppercutHiMake",
            "LeftUppercutHiMiss", "LeftUppercutLoMake", "LeftUppercutLoMiss",
        ],
    ),
    (
        "right_hand_stats",
        &[
            "RightBodyKickMake", "RightBodyKickMiss", "RightCrossAttempts", "RightCrossMake",
            "RightCrossMissed", "RightElbowMake", "RightElbowMiss", "RightHighKickMake",
            "RightHighKickMiss", "RightHookHiMake", "RightHookHiMiss", "RightHookLoMake",
            "RightHookLoMiss", "RightJabHiMake", "RightJabHiMiss", "RightJabLoMake",
            "RightJabLoMiss", "RightLegKickMake", "RightLegKickMiss", "RightOverhandMake",
            "RightOverhandMiss", "RightSpinBackFistMake", "RightSpinBackFistMiss",
            "RightStraightHiMake", "RightStraightHiMiss", "RightStraightLoMake",
            "RightStraightLoMiss", "RightUppercutHiMake", "RightUppercutHiMiss",
            "RightUppercutLoMake", "RightUppercutLoMiss",
        ],
    ),
    (
        "round_stats",
        &[
            "Round1StrikesLanded", "Round1StrikesThrown", "Round2StrikesLanded",
            "Round2StrikesThrown", "Round3StrikesLanded", "Round3StrikesThrown",
            "Round4StrikesLanded", "Round4StrikesThrown", "Round5StrikesLanded",
            "Round5StrikesThrown",
        ],
    ),
    (
        "knockout_stats",
        &[
            "KnockoutLossviaBodyKick", "KnockoutLossviaBodyShot", "KnockoutLossviaHeadKick",
            "KnockoutLossviaHook", "KnockoutLossviaJab", "KnockoutLossviaLegKick",
            "KnockoutLossviaStraight", "KnockoutLossviaUppercut", "KnockoutWinviaLeftElbow",
            "KnockoutWinviaLeftFoot", "KnockoutWinviaLeftHand", "KnockoutWinviaLeftKnee",
            "KnockoutWinviaRightElbow", "KnockoutWinviaRightFoot", "KnockoutWinviaRightHand",
            "KnockoutWinviaRightKnee",
        ],
    ),
    (
        "fight_outcome_stats",
        &[
            "FighterWins", "FighterLoss", "FighterDraw", "FighterNC", "FighterKOWins",
            "FighterKOLoss", "FighterTKOWins", "FighterTKOLoss", "FighterSUBWin", "FighterSUBLoss",
            "FighterUDWins", "FighterUDLoss", "FighterMajDecWin", "FighterMajDecLoss",
            "FighterSplitDecWin", "FighterSplitDecLoss", "WinsInThe4thRd", "WinsInThe5thRd",
            "WinsInTitleFights", "LossesInThe4thRd", "LossesInThe5thRd", "LossesInTitleFights",
        ],
    ),
    (
        "stance_matchup_stats",
        &[
            "WinsVsOrthodox", "WinsVsSouthpaw", "WinsVsSwitch", "LossesVsOrthodox",
            "LossesVsSouthpaw", "LossesVsSwitch", "OrthodoxWins", "OrthodoxLosses", "SouthpawWins",
            "SouthpawLosses", "SwitchWins", "SwitchLosses",
        ],
    ),
    (
        "total_stats",
        &[
            "TotalBodyKicksMade", "TotalBodyKicksMissed", "TotalBodyKicksThrown",
            "TotalCrossAttempts", "TotalCrossMake", "TotalCrossMissed", "TotalElbowsMade",
            "TotalElbowsMissed", "TotalElbowsThrown", "TotalHighKicksMade", "TotalHighKicksMissed",
            "TotalHighKicksThrown", "TotalHooksMade", "TotalHooksMissed", "TotalHooksThrown",
            "TotalJabsMade", "TotalJabsMissed", "TotalJabsThrown", "TotalKicksLanded",
            "TotalKicksThrown", "TotalLegKicksMade", "TotalLegKicksMissed", "TotalLegKicksThrown",
            "TotalOverhandsMade", "TotalOverhandsMissed", "TotalOverhandsThrown",
            "TotalPunchesLanded", "TotalPunchesThrown", "TotalSpinBackFistsMade",
            "TotalSpinBackFistsMissed", "TotalSpinBackFistsThrown", "TotalStraightsMade",
            "TotalStraightsMissed", "TotalStraightsThrown", "TotalStrikesLanded",
            "TotalUppercutsMade", "TotalUppercutsMissed", "TotalUppercutsThrown",
        ],
    ),
    (
        "gameplan_stats",
        &[
            "GrapplingGameplans", "GrapplingGameplanWins", "GrapplingGameplanLoss",
            "StrikingGameplans", "StrikingGameplanWins", "StrikingGameplanLoss",
        ],
    ),
    (
        "defensive_stats",
        &[
            "TimesAnklePicked", "TimesBodyLocked", "TimesDoubleLegged", "TimesImanaried",
            "TimesKnockedDown", "TimesSingleLegged", "TimesStunned", "TimesThrown", "TimesTripped",
        ],
    ),
];
