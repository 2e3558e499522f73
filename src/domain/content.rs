/// Static content tables.
///
/// Everything the levels show or validate against lives here as `'static`
/// data: bias definitions, the e-mail zones, story blocks and timeline
/// slots, quiz questions, battle attacks and counter-cards.
///
/// Nothing in this module is ever mutated. Widgets index into these tables
/// and compare against the `correct` markers / numeric effects.

use super::level::LevelId;

// ── Level 1: bias scan ──

pub struct Bias {
    pub id: &'static str,
    pub name: &'static str,
    pub explanation: &'static str,
}

pub struct BiasZone {
    pub bias: &'static str,
    pub text: &'static str,
}

pub struct BiasLabel {
    pub id: &'static str,
    pub label: &'static str,
}

pub const BIASES: &[Bias] = &[
    Bias {
        id: "loss-aversion",
        name: "Loss Aversion",
        explanation: "The fear of losses weighs heavier than the joy of gains. \
            Focusing on a 'destroyed reputation' is classic loss aversion.",
    },
    Bias {
        id: "zero-risk",
        name: "Zero-Risk Bias",
        explanation: "The wish to eliminate a risk completely (0%) instead of managing it. \
            100% security is unrealistic in IT.",
    },
    Bias {
        id: "omission",
        name: "Omission Bias",
        explanation: "The risk of acting is rated higher than the risk of not acting, \
            although standing still is often just as harmful.",
    },
];

pub const MAIL_FROM: &str = "From: Herr D. S. Gvo (Data Protection Officer)";
pub const MAIL_SUBJECT: &str = "Subject: RE: Request online function BärGPT";

pub const BIAS_ZONES: &[BiasZone] = &[
    BiasZone {
        bias: "loss-aversion",
        text: "The risk of a data leak is unacceptable - a single incident would \
            destroy our reputation beyond repair.",
    },
    BiasZone {
        bias: "zero-risk",
        text: "We can only accept solutions that guarantee a 100% secure system.",
    },
    BiasZone {
        bias: "omission",
        text: "It is better to stay with the current system than to cause problems \
            through hasty changes.",
    },
];

pub const BIAS_LABELS: &[BiasLabel] = &[
    BiasLabel { id: "loss-aversion", label: "Loss Aversion" },
    BiasLabel { id: "zero-risk", label: "Zero-Risk Bias" },
    BiasLabel { id: "omission", label: "Omission Bias" },
    BiasLabel { id: "confirmation", label: "Confirmation Bias" },
    BiasLabel { id: "anchoring", label: "Anchoring Bias" },
];

pub const BIAS_MISS_TITLE: &str = "Not quite...";
pub const BIAS_MISS_TEXT: &str =
    "Read the passage again. Which psychological effect is hiding behind it?";

pub fn bias_by_id(id: &str) -> Option<&'static Bias> {
    BIASES.iter().find(|b| b.id == id)
}

// ── Level 4: storyline ──

pub struct StoryBlock {
    pub id: &'static str,
    pub text: &'static str,
    /// Belongs somewhere on the timeline. Distractors belong nowhere.
    pub correct: bool,
}

pub struct TimelineSlot {
    pub label: &'static str,
    /// Id of the one block that fits here.
    pub block: &'static str,
}

pub const STORY_BLOCKS: &[StoryBlock] = &[
    StoryBlock { id: "world", text: "Sabine handles a citizen request on the new solar law", correct: true },
    StoryBlock { id: "call", text: "BärGPT does not know the new law (data cut-off)", correct: true },
    StoryBlock { id: "refusal", text: "Data protection objects, Sabine uses unsafe workarounds", correct: true },
    StoryBlock { id: "mentor", text: "CityLAB presents the data-protection filter", correct: true },
    StoryBlock { id: "reward", text: "Sabine gets a sourced answer within seconds", correct: true },
    StoryBlock { id: "api-spec", text: "Technical API specification (boring!)", correct: false },
    StoryBlock { id: "cost-sheet", text: "Cost breakdown Q3/2024", correct: false },
];

pub const TIMELINE_SLOTS: &[TimelineSlot] = &[
    TimelineSlot { label: "1. Ordinary World", block: "world" },
    TimelineSlot { label: "2. The Call", block: "call" },
    TimelineSlot { label: "3. The Refusal", block: "refusal" },
    TimelineSlot { label: "4. The Mentor", block: "mentor" },
    TimelineSlot { label: "5. The Reward", block: "reward" },
];

pub const STORY_HIT_TITLE: &str = "Perfectly placed!";
pub const STORY_HIT_TEXT: &str =
    "The hero's journey takes shape. You are building an emotional connection!";
pub const STORY_DULL_TITLE: &str = "Boring!";
pub const STORY_DULL_TEXT: &str =
    "The CDO nearly falls asleep. Technical details do not belong in a story.";
pub const STORY_ORDER_TITLE: &str = "Wrong order!";
pub const STORY_ORDER_TEXT: &str =
    "The hero's journey has a fixed structure. Think about what comes first.";

// ── Levels 3 & 5: quizzes ──

pub struct QuizOption {
    pub label: &'static str,
    pub correct: bool,
}

pub struct Question {
    pub prompt: &'static str,
    pub options: &'static [QuizOption],
    pub on_correct: &'static str,
    pub on_wrong: &'static str,
}

pub const QUIZ_HIT_TITLE: &str = "Data Clarity Bonus!";
pub const QUIZ_MISS_TITLE: &str = "Not optimal...";

pub const DATA_QUESTIONS: &[Question] = &[
    Question {
        prompt: "The CDO asks about ROI. Which visualisation do you pick?",
        options: &[
            QuizOption { label: "Time saved per case: 47 min -> 12 min", correct: true },
            QuizOption { label: "Technical architecture diagram", correct: false },
        ],
        on_correct: "Right! Concrete numbers convince. Time is money in the administration.",
        on_wrong: "Technical details bore decision makers. Show the business impact!",
    },
    Question {
        prompt: "How do you present the security measures?",
        options: &[
            QuizOption { label: "Comparison: BärGPT filter vs. shadow-IT risks", correct: true },
            QuizOption { label: "List of all technical security features", correct: false },
        ],
        on_correct: "Perfect! The comparison shows the alternative (shadow IT) is RISKIER.",
        on_wrong: "Feature lists do not convince. Show the relative advantage!",
    },
    Question {
        prompt: "The CDO asks about the risk of shadow IT. How do you answer?",
        options: &[
            QuizOption { label: "Risk matrix: shadow IT = high likelihood + high damage", correct: true },
            QuizOption { label: "Play the topic down", correct: false },
        ],
        on_correct: "Right! Standing still IS the risk. That reframes the discussion.",
        on_wrong: "Dangerous! Ignored risks come back. Use them as an argument FOR change!",
    },
];

pub const FRAMING_QUESTIONS: &[Question] = &[
    Question {
        prompt: "The meeting starts in five minutes. What do you put on the first slide?",
        options: &[
            QuizOption { label: "Agenda with twelve bullet points", correct: false },
            QuizOption { label: "A question: 'What does one lost hour per case cost us?'", correct: true },
            QuizOption { label: "The project logo", correct: false },
        ],
        on_correct: "Pre-suasion! The opening question directs attention before the argument.",
        on_wrong: "The first impression frames everything after it. Open with the problem.",
    },
    Question {
        prompt: "The CDO hesitates. Which reference do you bring up?",
        options: &[
            QuizOption { label: "Hamburg already runs an online assistant", correct: true },
            QuizOption { label: "A vendor whitepaper", correct: false },
        ],
        on_correct: "Social proof: peers who already did it lower the perceived risk.",
        on_wrong: "Vendor material sounds like sales. Peers are more credible.",
    },
    Question {
        prompt: "How do you phrase the rollout?",
        options: &[
            QuizOption { label: "Full rollout to all departments at once", correct: false },
            QuizOption { label: "A limited pilot as a real-world lab", correct: true },
            QuizOption { label: "Postpone until the next budget year", correct: false },
        ],
        on_correct: "A small, reversible step removes the fear of an irreversible mistake.",
        on_wrong: "Too big or too late. A reversible pilot makes saying yes easy.",
    },
];

pub fn quiz_for(level: LevelId) -> &'static [Question] {
    match level {
        LevelId::FramingQuiz => FRAMING_QUESTIONS,
        _ => DATA_QUESTIONS,
    }
}

// ── Levels 2 & 6: battles ──

pub struct Attack {
    pub name: &'static str,
    pub text: &'static str,
    pub damage: u32,
}

pub struct Card {
    pub name: &'static str,
    pub effect: &'static str,
    /// Persuasion power. Zero or negative means ineffective or counterproductive.
    pub power: i32,
    pub description: &'static str,
}

/// Alternative win rule of the final battle: both thresholds at once.
pub struct FinalWin {
    pub meter_min: u32,
    pub enemy_max: u32,
}

pub struct BattleSpec {
    pub opponent: &'static str,
    pub attacks: &'static [Attack],
    pub deck: &'static [Card],
    pub hand_size: usize,
    pub player_hp: u32,
    pub enemy_hp: u32,
    /// Approval gained per effective card.
    pub card_delta: i32,
    pub final_win: Option<FinalWin>,
}

pub const SKIRMISH_ATTACKS: &[Attack] = &[
    Attack { name: "Budget Freeze", text: "There is simply no money left this year.", damage: 10 },
    Attack { name: "Not My Department", text: "That is an IT topic, not ours.", damage: 10 },
    Attack { name: "Next Fiscal Year", text: "Let us put it on the list for next year.", damage: 15 },
];

pub const SKIRMISH_DECK: &[Card] = &[
    Card { name: "Cost-Benefit Sheet", effect: "+20 persuasion", power: 20, description: "One page, three numbers, one conclusion." },
    Card { name: "Quick Win", effect: "+15 persuasion", power: 15, description: "The pilot pays for itself within a quarter." },
    Card { name: "Peer City", effect: "+15 persuasion", power: 15, description: "Munich budgeted it from existing funds." },
    Card { name: "Buzzword Bingo", effect: "Ineffective", power: 0, description: "Synergies! Disruption! Blockchain!" },
    Card { name: "Blame IT", effect: "Backfires", power: -5, description: "It is all the IT department's fault anyway." },
];

pub const BOSS_ATTACKS: &[Attack] = &[
    Attack { name: "GDPR Panic", text: "The GDPR forbids this! We risk fines in the millions!", damage: 15 },
    Attack { name: "Press Fear", text: "Imagine the headlines: Berlin leaks citizen data!", damage: 20 },
    Attack { name: "Status Quo", text: "We have never done it this way. Why change now?", damage: 10 },
    Attack { name: "Blame Ping-Pong", text: "Who takes responsibility if something goes wrong?", damage: 15 },
];

pub const BOSS_DECK: &[Card] = &[
    Card { name: "Pre-Mortem", effect: "+25 persuasion", power: 25, description: "We simulate failures up front and build filters in." },
    Card { name: "FOMO Card", effect: "+20 persuasion", power: 20, description: "Hamburg is already doing it. Do we want to fall behind?" },
    Card { name: "Pilot Plan", effect: "+15 persuasion", power: 15, description: "Limited rollout as a real-world lab. Low risk." },
    Card { name: "Sabine's Story", effect: "+20 persuasion", power: 20, description: "A real employee tells of her frustration." },
    Card { name: "Shadow-IT Warning", effect: "+15 persuasion", power: 15, description: "Staff already use private chatbot accounts!" },
    Card { name: "Tech Jargon", effect: "Ineffective", power: 0, description: "API endpoints, TLS 1.3, OAuth 2.0..." },
];

pub static SKIRMISH: BattleSpec = BattleSpec {
    opponent: "Unit Head N. O. Budget",
    attacks: SKIRMISH_ATTACKS,
    deck: SKIRMISH_DECK,
    hand_size: 4,
    player_hp: 100,
    enemy_hp: 60,
    card_delta: 5,
    final_win: None,
};

pub static BOSS: BattleSpec = BattleSpec {
    opponent: "Herr D. S. Gvo",
    attacks: BOSS_ATTACKS,
    deck: BOSS_DECK,
    hand_size: 4,
    player_hp: 100,
    enemy_hp: 100,
    card_delta: 0,
    final_win: Some(FinalWin { meter_min: 85, enemy_max: 30 }),
};

pub fn battle_for(level: LevelId) -> &'static BattleSpec {
    match level {
        LevelId::BossBattle => &BOSS,
        _ => &SKIRMISH,
    }
}

// ── Side content ──

pub const FAX_TITLE: &str = "Incoming fax";
pub const FAX_TEXT: &str = "The fax machine wakes up with a screech and prints one page: \
    'Please confirm receipt of this fax by fax.' The administration is still the administration.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_zone_has_a_known_bias_and_label() {
        for zone in BIAS_ZONES {
            assert!(bias_by_id(zone.bias).is_some(), "zone bias {}", zone.bias);
            assert!(BIAS_LABELS.iter().any(|l| l.id == zone.bias));
        }
        // Decoy labels exist and match no zone
        let decoys = BIAS_LABELS.iter()
            .filter(|l| !BIAS_ZONES.iter().any(|z| z.bias == l.id))
            .count();
        assert_eq!(decoys, 2);
    }

    #[test]
    fn each_slot_has_exactly_one_correct_block() {
        for slot in TIMELINE_SLOTS {
            let fits: Vec<_> = STORY_BLOCKS.iter().filter(|b| b.id == slot.block).collect();
            assert_eq!(fits.len(), 1, "slot {}", slot.label);
            assert!(fits[0].correct);
        }
        let correct = STORY_BLOCKS.iter().filter(|b| b.correct).count();
        assert_eq!(correct, TIMELINE_SLOTS.len());
    }

    #[test]
    fn every_question_has_exactly_one_correct_option() {
        for q in DATA_QUESTIONS.iter().chain(FRAMING_QUESTIONS) {
            assert_eq!(q.options.iter().filter(|o| o.correct).count(), 1, "{}", q.prompt);
        }
    }

    #[test]
    fn battle_decks_contain_ineffective_cards() {
        for spec in [&SKIRMISH, &BOSS] {
            assert!(spec.deck.iter().any(|c| c.power <= 0));
            assert!(spec.deck.iter().any(|c| c.power > 0));
            assert!(spec.hand_size <= spec.deck.len());
            assert!(!spec.attacks.is_empty());
        }
        assert!(SKIRMISH_DECK.iter().any(|c| c.power < 0));
    }
}
