//! Battle orchestration
//!
//! Idle -> Running -> Concluded. Every living attacker gets its own Tokio
//! task firing on its own period. The first action whose tactic runs dry
//! concludes the battle and aborts every task on both sides.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};

use crate::battle::action::{AttackAction, Firing};
use crate::battle::encounter::Encounter;
use crate::battle::log::{BattleLog, LogSlot};
use crate::core::config::BattleConfig;
use crate::core::error::{ClashError, ConstructionError, Result};
use crate::core::types::Side;

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Idle,
    Running,
    Concluded,
}

/// Verdict read from both formations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleOutcome {
    #[default]
    Undecided,
    Party1Victory,
    Party2Victory,
    Tie,
}

#[derive(Debug, Default)]
struct LatchState {
    concluded: bool,
    tasks: Vec<AbortHandle>,
}

/// One-shot conclusion flag plus the tasks it cancels
#[derive(Debug)]
struct Conclusion {
    state: Mutex<LatchState>,
    signal: watch::Sender<bool>,
}

impl Conclusion {
    fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            state: Mutex::new(LatchState::default()),
            signal,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LatchState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_concluded(&self) -> bool {
        self.lock().concluded
    }

    /// Track a task; aborts it right away if the battle already concluded
    fn register(&self, task: AbortHandle) {
        let mut state = self.lock();
        if state.concluded {
            task.abort();
        } else {
            state.tasks.push(task);
        }
    }

    /// Set the flag and abort every task. Returns false if already set.
    fn conclude(&self) -> bool {
        let tasks = {
            let mut state = self.lock();
            if state.concluded {
                return false;
            }
            state.concluded = true;
            std::mem::take(&mut state.tasks)
        };
        self.signal.send_replace(true);
        for task in &tasks {
            task.abort();
        }
        tracing::debug!(cancelled = tasks.len(), "battle concluded");
        true
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }
}

/// Two encounters fighting it out
#[derive(Debug)]
pub struct Battle {
    party1: Arc<Encounter>,
    party2: Arc<Encounter>,
    config: BattleConfig,
    log: LogSlot,
    started: bool,
    scheduled: usize,
    conclusion: Arc<Conclusion>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Battle {
    /// Pair two encounters. Fails with `InvalidEncounter` if a side is
    /// empty or both sides share a combatant.
    pub fn new(
        party1: impl Into<Arc<Encounter>>,
        party2: impl Into<Arc<Encounter>>,
        config: BattleConfig,
        log: Option<Arc<dyn BattleLog>>,
    ) -> Result<Self> {
        let party1 = party1.into();
        let party2 = party2.into();
        config.validate()?;

        for (side, encounter) in [(Side::Party1, &party1), (Side::Party2, &party2)] {
            if encounter.size() == 0 {
                return Err(ConstructionError::InvalidEncounter(format!(
                    "{side:?} fields no combatants"
                ))
                .into());
            }
        }
        if Arc::ptr_eq(&party1, &party2) {
            return Err(ConstructionError::InvalidEncounter(
                "both sides field the same encounter".into(),
            )
            .into());
        }
        let shared = party1.formation().occupants().find(|(_, left)| {
            party2
                .formation()
                .occupants()
                .any(|(_, right)| Arc::ptr_eq(*left, right))
        });
        if let Some((slot, combatant)) = shared {
            return Err(ConstructionError::InvalidEncounter(format!(
                "{} at {} fights for both sides",
                combatant.display_name(),
                slot
            ))
            .into());
        }

        Ok(Self {
            party1,
            party2,
            config,
            log: LogSlot::new(log),
            started: false,
            scheduled: 0,
            conclusion: Arc::new(Conclusion::new()),
            tasks: Mutex::new(Vec::new()),
        })
    }

    pub fn party1(&self) -> &Encounter {
        &self.party1
    }

    pub fn party2(&self) -> &Encounter {
        &self.party2
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn phase(&self) -> BattlePhase {
        if self.conclusion.is_concluded() {
            BattlePhase::Concluded
        } else if self.started {
            BattlePhase::Running
        } else {
            BattlePhase::Idle
        }
    }

    /// Number of attack actions scheduled by `run`
    pub fn scheduled_attackers(&self) -> usize {
        self.scheduled
    }

    /// Schedule one recurring attack per living attacker on both sides.
    /// Calling it again after the first time does nothing.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn run(&mut self) {
        if self.started {
            tracing::warn!("battle already started");
            return;
        }
        self.started = true;

        if self.party1.is_defeated() || self.party2.is_defeated() {
            tracing::info!("a side is already defeated, concluding immediately");
            self.conclusion.conclude();
            return;
        }

        let sides = [
            (Side::Party1, Arc::clone(&self.party1), Arc::clone(&self.party2)),
            (Side::Party2, Arc::clone(&self.party2), Arc::clone(&self.party1)),
        ];
        for (side, own, opponents) in sides {
            for (slot, attacker) in own.formation().occupants() {
                if attacker.is_defeated() {
                    continue;
                }
                let Some(tactic) = own.strategy().shared_tactic(slot) else {
                    continue;
                };
                let period = attacker
                    .attack_interval(&self.config)
                    .max(self.config.min_attack_interval())
                    .max(Duration::from_millis(1));
                let action = AttackAction::new(
                    side,
                    slot,
                    Arc::clone(attacker),
                    tactic,
                    Arc::clone(&opponents),
                    self.log.clone(),
                    self.config.damage_visibility,
                );
                let task = tokio::spawn(drive_attacker(
                    action,
                    period,
                    Arc::clone(&own),
                    Arc::clone(&self.conclusion),
                ));
                self.conclusion.register(task.abort_handle());
                self.tasks
                    .get_mut()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(task);
                self.scheduled += 1;
            }
        }

        tracing::info!(
            attackers = self.scheduled,
            party1 = self.party1.size(),
            party2 = self.party2.size(),
            "battle started"
        );
    }

    /// Suspend until the battle concludes, then detach the log sink.
    ///
    /// Also waits for every attack task to wind down, so no strike lands
    /// after this returns. Only meaningful after `run`; before it nothing
    /// can conclude the battle.
    pub async fn wait_for_end(&self) {
        let mut concluded = self.conclusion.subscribe();
        while !*concluded.borrow_and_update() {
            if concluded.changed().await.is_err() {
                break;
            }
        }
        let tasks = std::mem::take(
            &mut *self
                .tasks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        for task in tasks {
            // Aborted tasks report a cancellation error; nothing to recover.
            let _ = task.await;
        }
        self.log.detach();
        tracing::info!(outcome = ?self.outcome(), "battle over");
    }

    fn has_live_tasks(&self) -> bool {
        self.tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .any(|task| !task.is_finished())
    }

    /// Conclude and cancel every scheduled attack; a no-op once concluded
    pub fn cancel(&self) -> bool {
        self.conclusion.conclude()
    }

    pub fn is_cancelled(&self) -> bool {
        self.conclusion.is_concluded()
    }

    pub fn party1_won(&self) -> bool {
        self.party2.is_defeated() && !self.party1.is_defeated()
    }

    pub fn party1_lost(&self) -> bool {
        self.party1.is_defeated() && !self.party2.is_defeated()
    }

    pub fn party2_won(&self) -> bool {
        self.party1_lost()
    }

    pub fn party2_lost(&self) -> bool {
        self.party1_won()
    }

    pub fn tie_occurred(&self) -> bool {
        self.party1.is_defeated() && self.party2.is_defeated()
    }

    pub fn outcome(&self) -> BattleOutcome {
        if self.tie_occurred() {
            BattleOutcome::Tie
        } else if self.party1_won() {
            BattleOutcome::Party1Victory
        } else if self.party1_lost() {
            BattleOutcome::Party2Victory
        } else {
            BattleOutcome::Undecided
        }
    }

    /// Heal both formations and rewind both strategies for the next battle.
    ///
    /// Fails with `BattleInProgress` while the battle runs or while any
    /// attack task is still winding down after conclusion; await
    /// `wait_for_end` first.
    pub fn restore_combatants(&self) -> Result<()> {
        if self.phase() == BattlePhase::Running || self.has_live_tasks() {
            tracing::warn!("refusing to restore combatants mid-battle");
            return Err(ClashError::BattleInProgress);
        }
        self.party1.restore();
        self.party2.restore();
        Ok(())
    }

    /// Hand the encounters back as they stand. Call `restore_combatants`
    /// first to reuse them for another battle.
    pub fn into_encounters(self) -> (Arc<Encounter>, Arc<Encounter>) {
        (Arc::clone(&self.party1), Arc::clone(&self.party2))
    }
}

impl Drop for Battle {
    fn drop(&mut self) {
        self.conclusion.conclude();
    }
}

async fn drive_attacker(
    action: AttackAction,
    period: Duration,
    own: Arc<Encounter>,
    conclusion: Arc<Conclusion>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if conclusion.is_concluded() {
            break;
        }
        match action.fire() {
            Firing::Struck { .. } => {}
            Firing::AttackerDefeated => {
                // A side wiped out in a mutual kill leaves nobody able to
                // exhaust a tactic, so its last attacker closes the battle.
                if own.is_defeated() {
                    conclusion.conclude();
                }
                break;
            }
            Firing::Exhausted => {
                tracing::debug!(side = ?action.side(), slot = %action.slot(), "targets exhausted");
                conclusion.conclude();
                break;
            }
        }
    }
}
