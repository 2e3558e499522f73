/// Level identifiers and the top-level screen tag.
///
/// The campaign is a fixed, linear sequence:
///   Start → BiasScan → Skirmish → DataLab → Storyline → FramingQuiz → BossBattle → Win
///
/// No branching, no skipping. The only way back is a full restart.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum LevelId {
    BiasScan,
    Skirmish,
    DataLab,
    Storyline,
    FramingQuiz,
    BossBattle,
}

/// Interaction shape of a level. Decides which widget the shell mounts.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LevelKind {
    Bias,
    Battle,
    Matching,
    Quiz,
}

impl LevelId {
    pub const ALL: [LevelId; 6] = [
        LevelId::BiasScan,
        LevelId::Skirmish,
        LevelId::DataLab,
        LevelId::Storyline,
        LevelId::FramingQuiz,
        LevelId::BossBattle,
    ];

    pub const FIRST: LevelId = LevelId::BiasScan;
    pub const FINAL: LevelId = LevelId::BossBattle;

    /// 1-based position in the campaign, as shown in the HUD.
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|&l| l == self).map_or(0, |i| i + 1)
    }

    pub fn next(self) -> Option<LevelId> {
        let idx = self.number();
        Self::ALL.get(idx).copied()
    }

    pub fn kind(self) -> LevelKind {
        match self {
            LevelId::BiasScan => LevelKind::Bias,
            LevelId::Skirmish | LevelId::BossBattle => LevelKind::Battle,
            LevelId::Storyline => LevelKind::Matching,
            LevelId::DataLab | LevelId::FramingQuiz => LevelKind::Quiz,
        }
    }

    pub fn is_final(self) -> bool {
        self == Self::FINAL
    }

    pub fn title(self) -> &'static str {
        match self {
            LevelId::BiasScan => "The Diagnosis",
            LevelId::Skirmish => "Budget Skirmish",
            LevelId::Storyline => "The Persuasion Plan",
            LevelId::DataLab => "Data Intelligence",
            LevelId::FramingQuiz => "Pre-Suasion",
            LevelId::BossBattle => "The Boss Fight",
        }
    }

    pub fn tagline(self) -> &'static str {
        match self {
            LevelId::BiasScan => "Spot the psychological barriers in the data-protection e-mail",
            LevelId::Skirmish => "Win over the budget unit before the big meeting",
            LevelId::Storyline => "Build the perfect hero's journey for your pitch",
            LevelId::DataLab => "Pick the most convincing data visualisations",
            LevelId::FramingQuiz => "Frame the conversation before it starts",
            LevelId::BossBattle => "Convince the CDO against Herr D. S. Gvo",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    Start,
    Level(LevelId),
    Win,
}

impl Screen {
    pub fn level(self) -> Option<LevelId> {
        match self {
            Screen::Level(l) => Some(l),
            _ => None,
        }
    }
}
