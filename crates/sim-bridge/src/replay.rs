use tracing::debug;

use crate::{
    SimError, Simulation,
    protocol::{Observation, StepResponse},
};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStep {
    pub action: u32,
    pub reward: f32,
    /// The frame after the action was applied.
    pub observation: Observation,
}

/// Everything seen during one run, from reset to terminal (or the step limit).
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    initial: Observation,
    steps: Vec<RecordedStep>,
    terminated: bool,
}

impl Episode {
    #[must_use]
    pub const fn initial(&self) -> &Observation {
        &self.initial
    }

    #[must_use]
    pub fn steps(&self) -> &[RecordedStep] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `false` when recording stopped before the simulator reported an end.
    #[must_use]
    pub const fn terminated(&self) -> bool {
        self.terminated
    }

    #[must_use]
    pub fn total_reward(&self) -> f64 {
        self.steps.iter().map(|step| f64::from(step.reward)).sum()
    }

    /// Every frame in order, starting with the one from the reset.
    pub fn frames(&self) -> impl Iterator<Item = &Observation> + '_ {
        std::iter::once(&self.initial).chain(self.steps.iter().map(|step| &step.observation))
    }

    /// NaN totals rank below everything else.
    fn score(&self) -> f64 {
        let total = self.total_reward();
        if total.is_nan() {
            return f64::NEG_INFINITY;
        }
        total
    }
}

/// Builds an [`Episode`] one step at a time.
#[derive(Debug)]
pub struct EpisodeRecorder {
    episode: Episode,
}

impl EpisodeRecorder {
    #[must_use]
    pub const fn new(initial: Observation) -> Self {
        Self {
            episode: Episode {
                initial,
                steps: Vec::new(),
                terminated: false,
            },
        }
    }

    pub fn record(&mut self, action: u32, response: StepResponse) {
        self.episode.terminated |= response.terminal;
        self.episode.steps.push(RecordedStep {
            action,
            reward: response.reward,
            observation: response.observation,
        });
    }

    /// The frame the next action will be chosen from.
    #[must_use]
    pub fn last_observation(&self) -> &Observation {
        self.episode
            .steps
            .last()
            .map_or(&self.episode.initial, |step| &step.observation)
    }

    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.episode.terminated
    }

    #[must_use]
    pub fn finish(self) -> Episode {
        self.episode
    }
}

/// Resets `sim` and steps it with `policy` until it reports a terminal state
/// or `max_steps` actions were taken.
pub fn run_episode<S: Simulation>(
    mut sim: S,
    max_steps: usize,
    mut policy: impl FnMut(&Observation) -> u32,
) -> Result<Episode, SimError> {
    let mut recorder = EpisodeRecorder::new(sim.reset()?);

    for _ in 0..max_steps {
        if recorder.is_terminated() {
            break;
        }

        let action = policy(recorder.last_observation());
        let response = sim.step(action)?;
        recorder.record(action, response);
    }

    let episode = recorder.finish();
    debug!(
        steps = episode.len(),
        total_reward = episode.total_reward(),
        terminated = episode.terminated(),
        "episode finished"
    );

    Ok(episode)
}

/// The episode with the highest total reward; the earliest one wins ties.
pub fn best_episode<I>(episodes: I) -> Option<Episode>
where
    I: IntoIterator<Item = Episode>,
{
    episodes.into_iter().fold(None, |best, episode| match best {
        Some(best) if episode.score() <= best.score() => Some(best),
        _ => Some(episode),
    })
}
