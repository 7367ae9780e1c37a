//! Emoji-keyed expressive motion sequences.
//!
//! A closed enum rather than a string-keyed table so the set of supported
//! emotions is exhaustiveness-checked at compile time; the unmapped case is
//! handled explicitly at the lookup site. Fixed at process start, never
//! mutated.

use crate::robot::{AntennaTarget, HeadPose, MotionCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Surprised,
    Sleepy,
    Thinking,
    Celebrate,
    Confused,
    Love,
    Impatient,
}

impl Emotion {
    pub const ALL: [Emotion; 10] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprised,
        Emotion::Sleepy,
        Emotion::Thinking,
        Emotion::Celebrate,
        Emotion::Confused,
        Emotion::Love,
        Emotion::Impatient,
    ];

    pub fn from_emoji(emoji: &str) -> Option<Self> {
        match emoji {
            "😊" => Some(Emotion::Happy),
            "😢" => Some(Emotion::Sad),
            "😠" => Some(Emotion::Angry),
            "😲" => Some(Emotion::Surprised),
            "😴" => Some(Emotion::Sleepy),
            "🤔" => Some(Emotion::Thinking),
            "🎉" => Some(Emotion::Celebrate),
            "😕" => Some(Emotion::Confused),
            "❤️" => Some(Emotion::Love),
            "😤" => Some(Emotion::Impatient),
            _ => None,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Emotion::Happy => "😊",
            Emotion::Sad => "😢",
            Emotion::Angry => "😠",
            Emotion::Surprised => "😲",
            Emotion::Sleepy => "😴",
            Emotion::Thinking => "🤔",
            Emotion::Celebrate => "🎉",
            Emotion::Confused => "😕",
            Emotion::Love => "❤️",
            Emotion::Impatient => "😤",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Sleepy => "sleepy",
            Emotion::Thinking => "thinking",
            Emotion::Celebrate => "celebrate",
            Emotion::Confused => "confused",
            Emotion::Love => "love",
            Emotion::Impatient => "impatient",
        }
    }

    /// Sound played alongside the sequence, if the sequence has one.
    pub fn sound(self) -> Option<&'static str> {
        match self {
            Emotion::Happy => Some("happy1"),
            Emotion::Sad => Some("sad1"),
            Emotion::Surprised => Some("surprised1"),
            Emotion::Celebrate => Some("dance1"),
            Emotion::Confused => Some("confused1"),
            Emotion::Angry
            | Emotion::Sleepy
            | Emotion::Thinking
            | Emotion::Love
            | Emotion::Impatient => None,
        }
    }

    /// Ordered motion sequence for this emotion.
    ///
    /// Command counts are part of the contract: `Impatient` is exactly 3
    /// antenna commands, `Celebrate` exactly 2 combined head+antenna
    /// commands.
    pub fn commands(self) -> Vec<MotionCommand> {
        let head = |pose: HeadPose, d: f64| MotionCommand::head(pose, d);
        let antennas = |r: f64, l: f64, d: f64| MotionCommand::antennas(AntennaTarget::new(r, l), d);
        let neutral = |d: f64| MotionCommand::both(HeadPose::neutral(), AntennaTarget::zero(), d);

        match self {
            Emotion::Happy => vec![
                MotionCommand::both(
                    HeadPose {
                        z: 10.0,
                        ..HeadPose::default()
                    },
                    AntennaTarget::new(0.4, -0.4),
                    0.4,
                ),
                neutral(0.4),
            ],
            Emotion::Sad => vec![
                head(
                    HeadPose {
                        z: -10.0,
                        pitch: 20.0,
                        ..HeadPose::default()
                    },
                    1.0,
                ),
                neutral(1.2),
            ],
            Emotion::Angry => vec![
                head(
                    HeadPose {
                        z: -5.0,
                        pitch: -10.0,
                        ..HeadPose::default()
                    },
                    0.3,
                ),
                head(HeadPose::with_yaw(-10.0), 0.2),
                head(HeadPose::with_yaw(10.0), 0.2),
                neutral(0.5),
            ],
            Emotion::Surprised => vec![
                head(
                    HeadPose {
                        z: 15.0,
                        pitch: -15.0,
                        ..HeadPose::default()
                    },
                    0.25,
                ),
                antennas(1.0, 1.0, 0.25),
                neutral(0.6),
            ],
            Emotion::Sleepy => vec![
                head(
                    HeadPose {
                        z: -15.0,
                        pitch: 25.0,
                        ..HeadPose::default()
                    },
                    1.5,
                ),
                antennas(2.8, -2.8, 1.0),
                neutral(1.5),
            ],
            Emotion::Thinking => vec![
                head(
                    HeadPose {
                        roll: 12.0,
                        yaw: 15.0,
                        ..HeadPose::default()
                    },
                    0.8,
                ),
                antennas(0.8, 0.0, 0.4),
                neutral(0.8),
            ],
            Emotion::Celebrate => vec![
                MotionCommand::both(
                    HeadPose {
                        z: 20.0,
                        ..HeadPose::default()
                    },
                    AntennaTarget::new(0.8, -0.8),
                    0.4,
                ),
                neutral(0.5),
            ],
            Emotion::Confused => vec![
                head(
                    HeadPose {
                        roll: -15.0,
                        ..HeadPose::default()
                    },
                    0.5,
                ),
                head(
                    HeadPose {
                        roll: 15.0,
                        ..HeadPose::default()
                    },
                    0.5,
                ),
                neutral(0.5),
            ],
            Emotion::Love => vec![
                head(
                    HeadPose {
                        roll: 8.0,
                        pitch: 10.0,
                        ..HeadPose::default()
                    },
                    0.8,
                ),
                antennas(0.5, 0.5, 0.4),
                neutral(0.8),
            ],
            Emotion::Impatient => vec![
                antennas(1.0, -1.0, 0.2),
                antennas(-1.0, 1.0, 0.2),
                antennas(0.0, 0.0, 0.2),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emoji_round_trip_is_total_over_all_variants() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::from_emoji(emotion.emoji()), Some(emotion));
        }
    }

    #[test]
    fn table_has_ten_entries() {
        assert_eq!(Emotion::ALL.len(), 10);
    }

    #[test]
    fn unknown_emoji_is_unmapped() {
        assert_eq!(Emotion::from_emoji("🔥"), None);
        assert_eq!(Emotion::from_emoji(""), None);
        assert_eq!(Emotion::from_emoji("happy"), None);
    }

    #[test]
    fn documented_command_counts_hold() {
        assert_eq!(Emotion::Impatient.commands().len(), 3);
        assert!(Emotion::Impatient.sound().is_none());
        assert_eq!(Emotion::Celebrate.commands().len(), 2);
        assert_eq!(Emotion::Celebrate.sound(), Some("dance1"));
    }

    #[test]
    fn every_sequence_ends_at_rest() {
        // Every sequence's last command zeroes whatever it moved.
        for emotion in Emotion::ALL {
            let last = *emotion.commands().last().unwrap();
            if let Some(head) = last.head {
                assert_eq!(head, HeadPose::neutral(), "{emotion:?}");
            }
            if let Some(antennas) = last.antennas {
                assert_eq!(antennas, AntennaTarget::zero(), "{emotion:?}");
            }
        }
    }

    #[test]
    fn every_sequence_has_positive_durations() {
        for emotion in Emotion::ALL {
            assert!(emotion.commands().iter().all(|c| c.duration > 0.0));
        }
    }
}
