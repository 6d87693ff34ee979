//! The Sidero Valley contact roster

use crate::disclosure::clues::ConditionalClue;
use crate::disclosure::roles::DataAccess;

/// Everything the dialogue prompt needs to play one NPC
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NpcProfile {
    pub key: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    pub personality: &'static str,
    pub data_access: DataAccess,
    /// Charged on the first interview only
    pub cost: u32,
    pub always_reveal: &'static [&'static str],
    pub conditional_clues: &'static [ConditionalClue],
    pub red_herrings: &'static [&'static str],
    pub unknowns: &'static [&'static str],
    /// Session flag set once this NPC has been interviewed
    pub unlocks: Option<&'static str>,
    pub available_at_start: bool,
}

pub static ROSTER: [NpcProfile; 8] = [
    NpcProfile {
        key: "dr_chen",
        name: "Dr. Chen",
        role: "Hospital Director",
        personality: "Busy, precise and protective of the hospital's reputation. \
                      Respects data and gets impatient with vague questions.",
        data_access: DataAccess::HospitalCases,
        cost: 100,
        always_reveal: &[
            "The hospital has admitted a cluster of children with fever, seizures and confusion.",
            "Most admitted children come from Nalu and Kabwe.",
        ],
        conditional_clues: &[
            ConditionalClue {
                keyword: "csf",
                clue: "Lumbar punctures showed clear CSF with raised white cells, suggesting a viral encephalitis.",
            },
            ConditionalClue {
                keyword: "vaccin",
                clue: "Few of the sick children have any record of JE vaccination.",
            },
            ConditionalClue {
                keyword: "death",
                clue: "Two of the severe cases have died; several survivors still have weakness or seizures.",
            },
        ],
        red_herrings: &["Some staff think a new brand of well-water filter is to blame."],
        unknowns: &["Exactly what the children ate", "Mosquito numbers in the villages"],
        unlocks: None,
        available_at_start: true,
    },
    NpcProfile {
        key: "nurse_joy",
        name: "Nurse Joy",
        role: "Triage Nurse",
        personality: "Warm, talkative and observant. Remembers faces and dates well.",
        data_access: DataAccess::TriageLogs,
        cost: 50,
        always_reveal: &["The first sick children arrived in early July."],
        conditional_clues: &[
            ConditionalClue {
                keyword: "age",
                clue: "Almost all the patients I triaged were under fifteen.",
            },
            ConditionalClue {
                keyword: "evening",
                clue: "Mothers told me the children had been playing outside near the fields in the evenings.",
            },
        ],
        red_herrings: &["A few adults came in with ordinary malaria at the same time."],
        unknowns: &["Laboratory results", "Animal health in the villages"],
        unlocks: None,
        available_at_start: true,
    },
    NpcProfile {
        key: "mama_kofi",
        name: "Mama Kofi",
        role: "Mother of a Sick Child",
        personality: "Worried and tired, suspicious of officials at first but opens up to kindness.",
        data_access: DataAccess::General,
        cost: 25,
        always_reveal: &["Her son fell ill suddenly with a high fever and then started shaking."],
        conditional_clues: &[
            ConditionalClue {
                keyword: "pig",
                clue: "The neighbours keep pigs in a pen just behind our house.",
            },
            ConditionalClue {
                keyword: "net",
                clue: "We only have one net and the older children sleep without it.",
            },
            ConditionalClue {
                keyword: "evening",
                clue: "My son helps bring the animals in from the rice fields at dusk.",
            },
        ],
        red_herrings: &["She wonders if the new school lunch made him sick."],
        unknowns: &["Vaccination programmes", "Cases in other villages"],
        unlocks: None,
        available_at_start: true,
    },
    NpcProfile {
        key: "foreman_rex",
        name: "Foreman Rex",
        role: "Rice Cooperative Foreman",
        personality: "Gruff and practical. Worried about the harvest and dislikes being blamed.",
        data_access: DataAccess::General,
        cost: 50,
        always_reveal: &["The paddies were flooded early this year after heavy rains."],
        conditional_clues: &[
            ConditionalClue {
                keyword: "irrigation",
                clue: "We opened the new irrigation canal in June; water has been standing everywhere since.",
            },
            ConditionalClue {
                keyword: "worker",
                clue: "None of my adult workers are sick, just some of their kids.",
            },
        ],
        red_herrings: &["He blames pesticide runoff from a farm upriver."],
        unknowns: &["Medical details of the cases"],
        unlocks: None,
        available_at_start: true,
    },
    NpcProfile {
        key: "teacher_grace",
        name: "Teacher Grace",
        role: "School Principal",
        personality: "Organised and caring. Keeps careful attendance records.",
        data_access: DataAccess::SchoolAttendance,
        cost: 25,
        always_reveal: &["Attendance has dropped since several pupils fell ill."],
        conditional_clues: &[
            ConditionalClue {
                keyword: "attendance",
                clue: "The absent pupils are mostly from Nalu, with a few from Kabwe and almost none from Tamu.",
            },
            ConditionalClue {
                keyword: "tamu",
                clue: "Tamu children were part of last year's vaccination day; the other villages missed it.",
            },
        ],
        red_herrings: &["A water tank at the school was cleaned in June."],
        unknowns: &["What happens at home after school"],
        unlocks: None,
        available_at_start: true,
    },
    NpcProfile {
        key: "vet_amina",
        name: "Vet Amina",
        role: "District Veterinary Officer",
        personality: "Energetic and scientific, eager to work with human health colleagues.",
        data_access: DataAccess::VetSurveillance,
        cost: 100,
        always_reveal: &["Pig farming in Nalu has grown a lot in the last two years."],
        conditional_clues: &[
            ConditionalClue {
                keyword: "sow",
                clue: "Several sows in Nalu aborted litters this season, which fits JE virus in pigs.",
            },
            ConditionalClue {
                keyword: "sample",
                clue: "I can collect pig serum from Nalu and Kabwe if the lab can test it.",
            },
        ],
        red_herrings: &["A farmer reported a sick goat, unrelated to the outbreak."],
        unknowns: &["Human case details"],
        unlocks: Some("pig_sampling"),
        available_at_start: false,
    },
    NpcProfile {
        key: "mr_osei",
        name: "Mr. Osei",
        role: "Environmental Health Officer",
        personality: "Methodical and quiet, happiest with a clipboard in the field.",
        data_access: DataAccess::EnvironmentalData,
        cost: 100,
        always_reveal: &["Culex mosquitoes are breeding heavily in the flooded paddies."],
        conditional_clues: &[
            ConditionalClue {
                keyword: "trap",
                clue: "Light traps near the Nalu pig pens caught far more Culex than traps in Tamu.",
            },
            ConditionalClue {
                keyword: "dusk",
                clue: "Biting peaks at dusk, exactly when children are outdoors.",
            },
        ],
        red_herrings: &["Household water jars hold Aedes larvae, but those are not the main concern."],
        unknowns: &["Clinical outcomes of the patients"],
        unlocks: Some("mosquito_survey"),
        available_at_start: false,
    },
    NpcProfile {
        key: "healer_marcus",
        name: "Healer Marcus",
        role: "Private Healer",
        personality: "Proud and a little defensive, wary of government officials.",
        data_access: DataAccess::PrivateClinic,
        cost: 50,
        always_reveal: &["He treated feverish children in Nalu before anyone went to the hospital."],
        conditional_clues: &[
            ConditionalClue {
                keyword: "june",
                clue: "The first child I saw with fits was at the end of June, before the hospital cases.",
            },
            ConditionalClue {
                keyword: "record",
                clue: "I keep a notebook of every patient; you may look at it if you are respectful.",
            },
        ],
        red_herrings: &["He believes a curse on the new canal is involved."],
        unknowns: &["Laboratory testing"],
        unlocks: Some("early_cases"),
        available_at_start: false,
    },
];

pub fn roster() -> &'static [NpcProfile] {
    &ROSTER
}

pub fn find_npc(key: &str) -> Option<&'static NpcProfile> {
    ROSTER.iter().find(|p| p.key == key)
}

/// Keys of the NPCs a new session can interview
pub fn starting_contacts() -> impl Iterator<Item = &'static str> {
    ROSTER.iter().filter(|p| p.available_at_start).map(|p| p.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disclosure::triggers::UNLOCK_TRIGGERS;

    #[test]
    fn test_five_contacts_at_start() {
        assert_eq!(starting_contacts().count(), 5);
    }

    #[test]
    fn test_keys_unique() {
        for (i, a) in ROSTER.iter().enumerate() {
            assert!(ROSTER[i + 1..].iter().all(|b| b.key != a.key));
        }
    }

    #[test]
    fn test_every_locked_npc_has_a_trigger() {
        for npc in ROSTER.iter().filter(|p| !p.available_at_start) {
            assert!(
                UNLOCK_TRIGGERS.iter().any(|t| t.unlocks == npc.key),
                "{} cannot be unlocked",
                npc.key
            );
        }
    }

    #[test]
    fn test_clue_keywords_are_lowercase() {
        for npc in roster() {
            for clue in npc.conditional_clues {
                assert_eq!(clue.keyword, clue.keyword.to_lowercase());
            }
        }
    }
}
