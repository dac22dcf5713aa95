//! Run Game use case
//!
//! The coordinator: drives one odd-one-out session from seat assignment to
//! conclusion, one round at a time.

use crate::config::GameParams;
use crate::ports::actor::{ActContext, ActError, Actor};
use crate::ports::conversation_logger::{
    ConversationLogger, NoConversationLogger, session_event,
};
use crate::ports::history_store::{HistoryStore, NoHistory};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::shared::{act_with_retry, cancelled, deadline, is_cancelled};
use rand::SeedableRng;
use rand::rngs::StdRng;
use roundtable_domain::{
    Assignment, DomainError, GameOutcome, GameResult, GameSession, Participant, ParticipantId,
    Phase, PromptTemplate, ProtocolViolation, Roster, SessionId, TerminationPolicy, Turn, Vote,
    parse_judge_verdict, parse_vote_targets,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const ALL_FAILED: &str = "all participants failed to respond";

/// Errors that stop a session before it can produce a result
#[derive(Error, Debug)]
pub enum RunGameError {
    /// Malformed roster, candidates or parameters. No session was created.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The coordinator misused its own state machine.
    #[error("Protocol error: {0}")]
    Protocol(DomainError),
}

impl RunGameError {
    /// A call that retrying cannot fix (missing credentials, unknown model).
    fn unavailable(actor: &dyn Actor, e: ActError) -> Self {
        RunGameError::Configuration(format!("{} cannot play: {}", actor.name(), e))
    }
}

impl From<DomainError> for RunGameError {
    fn from(e: DomainError) -> Self {
        if e.is_configuration() {
            RunGameError::Configuration(e.to_string())
        } else {
            RunGameError::Protocol(e)
        }
    }
}

/// Input for the RunGame use case
pub struct RunGameInput {
    /// Seats in speaking order, each with the actor that plays it
    pub players: Vec<(Participant, Arc<dyn Actor>)>,
    /// Candidate words; the most frequent becomes the majority word
    pub candidates: Vec<String>,
    /// Natural-language success criterion, checked by the judge
    pub criterion: Option<String>,
    pub max_rounds: u32,
    /// Fixed session id; generated when `None`
    pub session_id: Option<SessionId>,
}

impl RunGameInput {
    pub fn new(
        players: Vec<(Participant, Arc<dyn Actor>)>,
        candidates: Vec<String>,
        max_rounds: u32,
    ) -> Self {
        Self {
            players,
            candidates,
            criterion: None,
            max_rounds,
            session_id: None,
        }
    }

    pub fn with_criterion(mut self, criterion: impl Into<String>) -> Self {
        self.criterion = Some(criterion.into());
        self
    }

    pub fn with_session_id(mut self, id: SessionId) -> Self {
        self.session_id = Some(id);
        self
    }
}

/// Use case for running one odd-one-out session
pub struct RunGameUseCase {
    judge: Option<Arc<dyn Actor>>,
    params: GameParams,
    history: Arc<dyn HistoryStore>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation: Option<CancellationToken>,
}

impl Default for RunGameUseCase {
    fn default() -> Self {
        Self::new()
    }
}

impl RunGameUseCase {
    pub fn new() -> Self {
        Self {
            judge: None,
            params: GameParams::default(),
            history: Arc::new(NoHistory),
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation: None,
        }
    }

    /// Referee that evaluates the success criterion
    pub fn with_judge(mut self, judge: Arc<dyn Actor>) -> Self {
        self.judge = Some(judge);
        self
    }

    pub fn with_params(mut self, params: GameParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = history;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Run a session with default (no-op) progress
    pub async fn start_session(&self, input: RunGameInput) -> Result<GameResult, RunGameError> {
        self.start_session_with_progress(input, &NoProgress).await
    }

    /// Run a session with progress callbacks
    pub async fn start_session_with_progress(
        &self,
        input: RunGameInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<GameResult, RunGameError> {
        if input.max_rounds == 0 {
            return Err(DomainError::ZeroRounds.into());
        }

        let (participants, actors): (Vec<_>, Vec<_>) = input
            .players
            .into_iter()
            .map(|(p, actor)| {
                let id = p.id.clone();
                (p, (id, actor))
            })
            .unzip();
        let roster = Roster::new(participants)?;

        let mut rng = match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let assignment = Assignment::partition(&roster, &input.candidates, &mut rng)?;
        if !assignment.ignored().is_empty() {
            warn!(
                "Ignoring extra candidate words: {}",
                assignment.ignored().join(", ")
            );
        }

        let criterion = input.criterion.filter(|c| !c.trim().is_empty());
        if criterion.is_some() && self.judge.is_none() {
            warn!("Success criterion given without a judge; only the vote decides");
        }

        // A stored session is continued, never replaced
        let mut history: Arc<dyn HistoryStore> = Arc::clone(&self.history);
        let mut session = match input.session_id {
            Some(id) => match self.history.load(&id).await {
                Ok(Some(prior)) => {
                    info!(session = %id, entries = prior.len(), "Resuming stored session");
                    GameSession::resume(prior, roster, self.params.history_window)
                }
                Ok(None) => GameSession::new(id, roster),
                Err(e) => {
                    warn!(
                        session = %id,
                        "Cannot read stored history, this run will not be saved: {}", e
                    );
                    history = Arc::new(NoHistory);
                    GameSession::new(id, roster)
                }
            },
            None => GameSession::new(SessionId::generate(), roster),
        };
        session.assign(assignment)?;

        info!(
            session = %session.id(),
            players = session.roster().len(),
            max_rounds = input.max_rounds,
            "Starting game session"
        );
        self.emit(
            &session,
            "session_started",
            json!({
                "players": session.roster().ids().map(|id| id.as_str()).collect::<Vec<_>>(),
                "max_rounds": input.max_rounds,
                "criterion": criterion,
                "vote_rule": self.params.vote_rule.to_string(),
                "termination": self.params.termination.as_str(),
            }),
        );

        let outcome = {
            let play = self.play(
                &mut session,
                &actors,
                criterion.as_deref(),
                input.max_rounds,
                history.as_ref(),
                progress,
            );
            tokio::select! {
                result = play => result?,
                _ = cancelled(self.cancellation.clone()) => GameOutcome::aborted("cancelled"),
                _ = deadline(self.params.session_timeout) => GameOutcome::aborted("session timed out"),
            }
        };

        session.conclude(outcome)?;
        save_history(history.as_ref(), &session).await;

        let result = session.into_result()?;
        info!(
            session = %result.session_id,
            rounds = result.rounds_played(),
            outcome = %result.outcome,
            "Game session concluded"
        );
        self.conversation_logger.log(session_event(
            "session_concluded",
            result.session_id.as_str(),
            json!({
                "outcome": result.outcome,
                "rounds": result.rounds_played(),
                "assignment": result.assignment,
                "violations": result.violations,
            }),
        ));
        Ok(result)
    }

    /// Round loop. Returns the outcome; the caller concludes the session.
    async fn play(
        &self,
        session: &mut GameSession,
        actors: &[(ParticipantId, Arc<dyn Actor>)],
        criterion: Option<&str>,
        max_rounds: u32,
        history: &dyn HistoryStore,
        progress: &dyn ProgressNotifier,
    ) -> Result<GameOutcome, RunGameError> {
        loop {
            if is_cancelled(&self.cancellation) {
                return Ok(GameOutcome::aborted("cancelled"));
            }
            let round = session.begin_round()?;
            info!(session = %session.id(), round, "Round started");

            self.phase_describe(session, actors, round, progress).await?;
            if session
                .current_round()
                .is_some_and(|r| r.all_turns_abstained())
            {
                warn!(session = %session.id(), round, "Every participant failed to describe");
                return Ok(GameOutcome::aborted(ALL_FAILED));
            }

            if is_cancelled(&self.cancellation) {
                return Ok(GameOutcome::aborted("cancelled"));
            }
            session.begin_voting()?;
            self.phase_vote(session, actors, round, progress).await?;

            if is_cancelled(&self.cancellation) {
                return Ok(GameOutcome::aborted("cancelled"));
            }
            if let Some(violation) = session.begin_evaluation()? {
                self.report_violation(session, &violation);
            }

            let decided = self.evaluate(session, criterion, round, progress).await?;
            save_history(history, session).await;

            if let Some(outcome) = decided {
                return Ok(outcome);
            }
            if session.rounds().len() as u32 >= max_rounds {
                info!(session = %session.id(), round, "Round limit reached");
                return Ok(GameOutcome::Inconclusive);
            }
        }
    }

    /// Each participant describes its word, strictly in roster order.
    async fn phase_describe(
        &self,
        session: &mut GameSession,
        actors: &[(ParticipantId, Arc<dyn Actor>)],
        round: u32,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), RunGameError> {
        let phase = Phase::Describe(round);
        progress.on_phase_start(&phase, actors.len());

        for (id, actor) in actors {
            let word = session
                .word_for(id)
                .ok_or_else(|| DomainError::UnknownParticipant(id.to_string()))?;
            let transcript = session.transcript();
            let ctx = ActContext::new(
                PromptTemplate::turn_prompt(id, word, round, &transcript),
                phase.clone(),
            );

            let (output, attempts) = act_with_retry(
                actor.as_ref(),
                &ctx,
                self.params.attempts(),
                self.params.turn_timeout,
                |o| (!o.content.trim().is_empty()).then_some(o),
            )
            .await
            .map_err(|e| RunGameError::unavailable(actor.as_ref(), e))?;

            let turn = match output {
                Some(o) => Turn::spoken(round, id.clone(), o.content.trim(), attempts)
                    .with_invocations(o.invocations),
                None => {
                    warn!(session = %session.id(), round, participant = %id, "Turn abstained");
                    Turn::abstained(round, id.clone(), attempts)
                }
            };
            let spoke = !turn.is_abstention();

            let leak = session.record_turn(turn)?;
            if let Some(recorded) = session.current_round().and_then(|r| r.turns.last()) {
                debug!(session = %session.id(), round, participant = %id, seq = recorded.seq, "Turn recorded");
                self.emit(session, "turn", json!(recorded));
            }
            if let Some(violation) = leak {
                self.report_violation(session, &violation);
            }
            progress.on_task_complete(&phase, id.as_str(), spoke);
        }

        progress.on_phase_complete(&phase);
        Ok(())
    }

    /// Each participant names who it suspects, in roster order.
    async fn phase_vote(
        &self,
        session: &mut GameSession,
        actors: &[(ParticipantId, Arc<dyn Actor>)],
        round: u32,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), RunGameError> {
        let phase = Phase::Vote(round);
        progress.on_phase_start(&phase, actors.len());
        let roster = session.roster().clone();

        for (id, actor) in actors {
            let transcript = session.transcript();
            let others: Vec<&ParticipantId> = roster.ids().filter(|other| *other != id).collect();
            let ctx = ActContext::new(
                PromptTemplate::vote_prompt(id, round, &transcript, &others),
                phase.clone(),
            );

            // An unparseable ballot counts as a failed attempt.
            let (ballot, _) = act_with_retry(
                actor.as_ref(),
                &ctx,
                self.params.attempts(),
                self.params.turn_timeout,
                |o| {
                    let targets = parse_vote_targets(&o.content, id, &roster);
                    (!targets.is_empty()).then(|| (targets, o.content.trim().to_string()))
                },
            )
            .await
            .map_err(|e| RunGameError::unavailable(actor.as_ref(), e))?;

            let vote = match ballot {
                Some((targets, reasoning)) => Vote::cast(id.clone(), round, targets, reasoning),
                None => {
                    warn!(session = %session.id(), round, participant = %id, "Vote abstained");
                    Vote::abstention(id.clone(), round)
                }
            };
            let counted = !vote.abstained;

            session.record_vote(vote)?;
            if let Some(recorded) = session.current_round().and_then(|r| r.votes.last()) {
                debug!(
                    session = %session.id(),
                    round,
                    participant = %id,
                    targets = ?recorded.targets,
                    "Vote recorded"
                );
                self.emit(session, "vote", json!(recorded));
            }
            progress.on_task_complete(&phase, id.as_str(), counted);
        }

        progress.on_phase_complete(&phase);
        Ok(())
    }

    /// Apply the termination policy to the finished round.
    async fn evaluate(
        &self,
        session: &GameSession,
        criterion: Option<&str>,
        round: u32,
        progress: &dyn ProgressNotifier,
    ) -> Result<Option<GameOutcome>, RunGameError> {
        let majority = session.minority_identified(self.params.vote_rule);
        let tally = session
            .current_round()
            .map(|r| r.tally())
            .unwrap_or_default();

        let decided = match self.params.termination {
            TerminationPolicy::MajorityFirst => {
                if majority {
                    Some(GameOutcome::MajorityWins)
                } else if self.criterion_met(session, criterion, round, progress).await? {
                    Some(GameOutcome::CriterionMet)
                } else {
                    None
                }
            }
            TerminationPolicy::CriterionFirst => {
                if self.criterion_met(session, criterion, round, progress).await? {
                    Some(GameOutcome::CriterionMet)
                } else if majority {
                    Some(GameOutcome::MajorityWins)
                } else {
                    None
                }
            }
        };

        info!(
            session = %session.id(),
            round,
            ballots = tally.ballots,
            abstentions = tally.abstentions,
            majority_correct = majority,
            "Round evaluated"
        );
        self.emit(
            session,
            "round_evaluated",
            json!({
                "round": round,
                "tally": tally,
                "majority_correct": majority,
                "decided": decided.as_ref().map(|o| o.label()),
            }),
        );
        Ok(decided)
    }

    /// Ask the judge about the success criterion.
    ///
    /// No criterion, no judge, or a judge failing every attempt all count as
    /// "not met". A judge that cannot be reached at all is a configuration error.
    async fn criterion_met(
        &self,
        session: &GameSession,
        criterion: Option<&str>,
        round: u32,
        progress: &dyn ProgressNotifier,
    ) -> Result<bool, RunGameError> {
        let (Some(criterion), Some(judge)) = (criterion, &self.judge) else {
            return Ok(false);
        };
        let phase = Phase::Judge(round);
        progress.on_phase_start(&phase, 1);

        let tally = session
            .current_round()
            .map(|r| r.tally())
            .unwrap_or_default();
        let prompt = PromptTemplate::judge_prompt(
            criterion,
            round,
            &session.transcript(),
            &tally,
            &session.odd_ones_out(),
        );
        let ctx = ActContext::new(prompt, phase.clone());

        let (verdict, _) = act_with_retry(
            judge.as_ref(),
            &ctx,
            self.params.attempts(),
            self.params.turn_timeout,
            |o| (!o.content.trim().is_empty()).then(|| parse_judge_verdict(&o.content)),
        )
        .await
        .map_err(|e| RunGameError::unavailable(judge.as_ref(), e))?;

        let met = verdict.unwrap_or(false);
        if verdict.is_none() {
            warn!(session = %session.id(), round, "Judge failed; criterion treated as not met");
        }
        debug!(session = %session.id(), round, met, "Judge verdict");
        progress.on_task_complete(&phase, judge.name(), verdict.is_some());
        progress.on_phase_complete(&phase);
        Ok(met)
    }

    fn report_violation(&self, session: &GameSession, violation: &ProtocolViolation) {
        warn!(session = %session.id(), round = violation.round(), "Protocol violation: {}", violation);
        self.emit(session, "protocol_violation", json!(violation));
    }

    fn emit(&self, session: &GameSession, event_type: &'static str, payload: serde_json::Value) {
        self.conversation_logger
            .log(session_event(event_type, session.id().as_str(), payload));
    }
}

async fn save_history(history: &dyn HistoryStore, session: &GameSession) {
    if let Err(e) = history.save(session.log()).await {
        warn!(session = %session.id(), "Failed to save session history: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::actor::{ActError, ActOutput};
    use crate::ports::conversation_logger::ConversationEvent;
    use crate::ports::history_store::HistoryError;
    use crate::ports::llm_gateway::GatewayError;
    use async_trait::async_trait;
    use roundtable_domain::{ContextLog, Model, SessionStatus};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Script = Box<dyn Fn(&ActContext) -> Result<String, ActError> + Send + Sync>;

    /// Actor answering from a closure, counting calls
    struct FnActor {
        name: String,
        script: Script,
        calls: AtomicUsize,
    }

    impl FnActor {
        fn new(
            name: &str,
            script: impl Fn(&ActContext) -> Result<String, ActError> + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                script: Box::new(script),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Actor for FnActor {
        fn name(&self) -> &str {
            &self.name
        }

        async fn act(&self, ctx: &ActContext) -> Result<ActOutput, ActError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.script)(ctx).map(ActOutput::text)
        }
    }

    /// Actor that never answers in time
    struct Stalled;

    #[async_trait]
    impl Actor for Stalled {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn act(&self, _ctx: &ActContext) -> Result<ActOutput, ActError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(ActOutput::text("too late"))
        }
    }

    #[derive(Default)]
    struct RecordingHistory {
        saves: Mutex<Vec<ContextLog>>,
    }

    #[async_trait]
    impl HistoryStore for RecordingHistory {
        async fn load(&self, id: &SessionId) -> Result<Option<ContextLog>, HistoryError> {
            Ok(self
                .saves
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|l| l.session_id() == id)
                .cloned())
        }

        async fn save(&self, log: &ContextLog) -> Result<(), HistoryError> {
            self.saves.lock().unwrap().push(log.clone());
            Ok(())
        }

        async fn list(&self) -> Result<Vec<SessionId>, HistoryError> {
            Ok(Vec::new())
        }
    }

    struct FailingHistory;

    #[async_trait]
    impl HistoryStore for FailingHistory {
        async fn load(&self, _id: &SessionId) -> Result<Option<ContextLog>, HistoryError> {
            Err(HistoryError::Io("disk gone".into()))
        }

        async fn save(&self, _log: &ContextLog) -> Result<(), HistoryError> {
            Err(HistoryError::Io("disk gone".into()))
        }

        async fn list(&self) -> Result<Vec<SessionId>, HistoryError> {
            Err(HistoryError::Io("disk gone".into()))
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<String>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type.to_string());
        }
    }

    const SEED: u64 = 7;
    const NAMES: [&str; 3] = ["Agent 1", "Agent 2", "Agent 3"];

    fn words() -> Vec<String> {
        ["Apple", "Pear", "Apple"].iter().map(|w| w.to_string()).collect()
    }

    fn seats() -> Vec<Participant> {
        NAMES
            .iter()
            .map(|n| Participant::player(*n, Model::default()))
            .collect()
    }

    /// The seat that will hold "Pear" for [`SEED`].
    fn odd_one() -> ParticipantId {
        let roster = Roster::new(seats()).unwrap();
        let a = Assignment::partition(&roster, &words(), &mut StdRng::seed_from_u64(SEED)).unwrap();
        a.minority_holders()[0].clone()
    }

    fn params() -> GameParams {
        GameParams::default().with_seed(Some(SEED))
    }

    /// Players that describe blandly and vote for `target(voter)`.
    fn players(
        target: impl Fn(&str) -> String + Send + Sync + Clone + 'static,
    ) -> Vec<(Participant, Arc<dyn Actor>)> {
        seats()
            .into_iter()
            .map(|p| {
                let me = p.id.to_string();
                let target = target.clone();
                let actor = FnActor::new(&me.clone(), move |ctx| match ctx.phase {
                    Phase::Vote(_) => Ok(format!("Hmm.\nVOTE: {}", target(&me))),
                    _ => Ok("It grows on trees.".to_string()),
                });
                (p, actor as Arc<dyn Actor>)
            })
            .collect()
    }

    /// Everyone votes for the odd one; the odd one votes for someone else.
    fn accurate_players() -> Vec<(Participant, Arc<dyn Actor>)> {
        let odd = odd_one().to_string();
        players(move |me| {
            if me == odd {
                NAMES.iter().find(|n| **n != odd).unwrap().to_string()
            } else {
                odd.clone()
            }
        })
    }

    /// Each player votes for the next seat: nobody gets a majority.
    fn scattered_players() -> Vec<(Participant, Arc<dyn Actor>)> {
        players(|me| {
            let i = NAMES.iter().position(|n| *n == me).unwrap();
            NAMES[(i + 1) % NAMES.len()].to_string()
        })
    }

    #[tokio::test]
    async fn test_majority_wins_in_first_round() {
        let use_case = RunGameUseCase::new().with_params(params());
        let result = use_case
            .start_session(RunGameInput::new(accurate_players(), words(), 3))
            .await
            .unwrap();

        assert_eq!(result.outcome, GameOutcome::MajorityWins);
        assert_eq!(result.rounds_played(), 1);
        let round = result.last_round().unwrap();
        assert_eq!(round.turns.len(), 3);
        assert_eq!(round.votes.len(), 3);
        assert!(round.votes.iter().all(|v| !v.targets.contains(&v.voter)));

        let assignment = result.assignment.unwrap();
        assert_eq!(assignment.minority_word(), "Pear");
        assert_eq!(assignment.minority_holders(), vec![&odd_one()]);
        assert!(result.violations.is_empty());
    }

    #[tokio::test]
    async fn test_inconclusive_at_round_limit() {
        let use_case = RunGameUseCase::new().with_params(params());
        let result = use_case
            .start_session(RunGameInput::new(scattered_players(), words(), 2))
            .await
            .unwrap();

        assert_eq!(result.outcome, GameOutcome::Inconclusive);
        assert_eq!(result.rounds_played(), 2);
        assert_eq!(result.log.turns().count(), 6);
        assert_eq!(result.log.votes().count(), 6);

        // Sequence numbers are strictly increasing across the whole log
        let seqs: Vec<u64> = result.log.entries().iter().map(|e| e.seq()).collect();
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_turn_prompt_carries_only_own_word_and_public_history() {
        let prompts: Arc<Mutex<Vec<(String, String)>>> = Arc::default();
        let players = seats()
            .into_iter()
            .map(|p| {
                let me = p.id.to_string();
                let prompts = Arc::clone(&prompts);
                let actor = FnActor::new(&me.clone(), move |ctx| {
                    prompts.lock().unwrap().push((me.clone(), ctx.prompt.clone()));
                    match ctx.phase {
                        Phase::Vote(_) => Ok("VOTE: nobody".to_string()),
                        _ => Ok(format!("clue from {}", me)),
                    }
                });
                (p, actor as Arc<dyn Actor>)
            })
            .collect();

        let result = RunGameUseCase::new()
            .with_params(params())
            .start_session(RunGameInput::new(players, words(), 1))
            .await
            .unwrap();
        let assignment = result.assignment.unwrap();
        let prompts = prompts.lock().unwrap();

        let turn_prompts: Vec<_> = prompts
            .iter()
            .filter(|(_, p)| p.contains("secret word"))
            .collect();
        assert_eq!(turn_prompts.len(), 3);
        for (i, (who, prompt)) in turn_prompts.iter().enumerate() {
            let id = ParticipantId::new(who.as_str());
            let own = assignment.word_for(&id).unwrap();
            let other = if own == "Apple" { "Pear" } else { "Apple" };
            assert!(prompt.contains(&format!("\"{}\"", own)));
            assert!(!prompt.contains(other), "{} saw the other word", who);
            // Earlier speakers' clues are visible, in order
            for earlier in &NAMES[..i] {
                assert!(prompt.contains(&format!("clue from {}", earlier)));
            }
        }
        // Vote prompts never carry any word
        for (_, prompt) in prompts.iter().filter(|(_, p)| p.contains("VOTE:")) {
            assert!(!prompt.contains("Apple") && !prompt.contains("Pear"));
        }
    }

    #[tokio::test]
    async fn test_failing_participant_abstains_after_retry() {
        let odd = odd_one().to_string();
        let broken = NAMES.iter().find(|n| **n != odd).unwrap().to_string();
        let failing = FnActor::new(&broken, |_| Err(ActError::EmptyResponse));

        let players: Vec<(Participant, Arc<dyn Actor>)> = accurate_players()
            .into_iter()
            .map(|(p, actor)| {
                if p.id.as_str() == broken {
                    (p, Arc::clone(&failing) as Arc<dyn Actor>)
                } else {
                    (p, actor)
                }
            })
            .collect();

        let result = RunGameUseCase::new()
            .with_params(params())
            .start_session(RunGameInput::new(players, words(), 1))
            .await
            .unwrap();

        // One turn and one vote, two attempts each
        assert_eq!(failing.calls(), 4);
        let round = result.last_round().unwrap();
        assert!(round.is_complete(&Roster::new(seats()).unwrap()));

        let turn = round.turns.iter().find(|t| t.speaker.as_str() == broken).unwrap();
        assert!(turn.is_abstention());
        assert_eq!(turn.attempts, 2);
        let vote = round.votes.iter().find(|v| v.voter.as_str() == broken).unwrap();
        assert!(vote.abstained);

        // Null turns are never shown to others
        assert_eq!(result.log.public_transcript().len(), 2);

        // The remaining ballots: 1 of 2 names the odd one, not a strict majority
        let tally = round.tally();
        assert_eq!(tally.ballots, 2);
        assert_eq!(tally.abstentions, 1);
        assert_eq!(result.outcome, GameOutcome::Inconclusive);
    }

    #[tokio::test]
    async fn test_every_participant_failing_aborts() {
        let players = seats()
            .into_iter()
            .map(|p| {
                let actor = FnActor::new(p.id.as_str(), |_| Err(ActError::Failed("down".into())));
                (p, actor as Arc<dyn Actor>)
            })
            .collect();

        let result = RunGameUseCase::new()
            .with_params(params())
            .start_session(RunGameInput::new(players, words(), 3))
            .await
            .unwrap();

        assert_eq!(result.outcome, GameOutcome::aborted(ALL_FAILED));
        assert_eq!(result.rounds_played(), 1);
        // Partial turns stay in the log for audit
        assert_eq!(result.log.turns().count(), 3);
        assert_eq!(result.log.votes().count(), 0);
    }

    #[tokio::test]
    async fn test_configuration_errors_are_fatal() {
        let use_case = RunGameUseCase::new().with_params(params());

        let two: Vec<_> = accurate_players().into_iter().take(2).collect();
        let err = use_case
            .start_session(RunGameInput::new(two, words(), 3))
            .await
            .unwrap_err();
        assert!(matches!(err, RunGameError::Configuration(_)));

        let err = use_case
            .start_session(RunGameInput::new(accurate_players(), words(), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, RunGameError::Configuration(_)));

        let err = use_case
            .start_session(RunGameInput::new(accurate_players(), vec![], 3))
            .await
            .unwrap_err();
        assert!(matches!(err, RunGameError::Configuration(_)));
    }

    fn missing_key() -> ActError {
        ActError::Gateway(GatewayError::MissingApiKey {
            provider: "deepseek".into(),
            env_var: "DEEPSEEK_API_KEY".into(),
        })
    }

    #[tokio::test]
    async fn test_missing_credentials_stop_the_session() {
        let broken = NAMES[1];
        let no_key = FnActor::new(broken, |_| Err(missing_key()));
        let players: Vec<(Participant, Arc<dyn Actor>)> = accurate_players()
            .into_iter()
            .map(|(p, actor)| {
                if p.id.as_str() == broken {
                    (p, Arc::clone(&no_key) as Arc<dyn Actor>)
                } else {
                    (p, actor)
                }
            })
            .collect();
        let history = Arc::new(RecordingHistory::default());

        let err = RunGameUseCase::new()
            .with_params(params())
            .with_history(history.clone())
            .start_session(RunGameInput::new(players, words(), 3))
            .await
            .unwrap_err();

        match err {
            RunGameError::Configuration(message) => {
                assert!(message.contains(broken));
                assert!(message.contains("DEEPSEEK_API_KEY"));
            }
            other => panic!("expected a configuration error, got {:?}", other),
        }
        // No retry and no further rounds
        assert_eq!(no_key.calls(), 1);
        assert!(history.saves.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_judge_without_credentials_is_a_configuration_error() {
        let judge = FnActor::new("referee", |_| Err(missing_key()));
        let err = RunGameUseCase::new()
            .with_params(params())
            .with_judge(judge.clone())
            .start_session(
                RunGameInput::new(scattered_players(), words(), 3).with_criterion("anything"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, RunGameError::Configuration(_)));
        assert_eq!(judge.calls(), 1);
    }

    #[tokio::test]
    async fn test_judge_can_end_the_game() {
        let judge = FnActor::new("referee", |ctx| {
            assert!(ctx.prompt.contains("Success criterion: everyone spoke"));
            Ok("SUCCESS: they all spoke.".to_string())
        });
        let result = RunGameUseCase::new()
            .with_params(params())
            .with_judge(judge.clone())
            .start_session(
                RunGameInput::new(scattered_players(), words(), 3).with_criterion("everyone spoke"),
            )
            .await
            .unwrap();

        assert_eq!(result.outcome, GameOutcome::CriterionMet);
        assert_eq!(result.rounds_played(), 1);
        assert_eq!(judge.calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_judge_means_not_met() {
        let judge = FnActor::new("referee", |_| Err(ActError::EmptyResponse));
        let result = RunGameUseCase::new()
            .with_params(params())
            .with_judge(judge.clone())
            .start_session(
                RunGameInput::new(scattered_players(), words(), 1).with_criterion("anything"),
            )
            .await
            .unwrap();

        assert_eq!(result.outcome, GameOutcome::Inconclusive);
        assert_eq!(judge.calls(), 2);
    }

    #[tokio::test]
    async fn test_majority_first_skips_judge_when_vote_decides() {
        let judge = FnActor::new("referee", |_| Ok("SUCCESS".to_string()));
        let result = RunGameUseCase::new()
            .with_params(params())
            .with_judge(judge.clone())
            .start_session(
                RunGameInput::new(accurate_players(), words(), 3).with_criterion("anything"),
            )
            .await
            .unwrap();

        assert_eq!(result.outcome, GameOutcome::MajorityWins);
        assert_eq!(judge.calls(), 0);
    }

    #[tokio::test]
    async fn test_criterion_first_policy() {
        let judge = FnActor::new("referee", |_| Ok("SUCCESS".to_string()));
        let result = RunGameUseCase::new()
            .with_params(params().with_termination(TerminationPolicy::CriterionFirst))
            .with_judge(judge.clone())
            .start_session(
                RunGameInput::new(accurate_players(), words(), 3).with_criterion("anything"),
            )
            .await
            .unwrap();

        assert_eq!(result.outcome, GameOutcome::CriterionMet);
        assert_eq!(judge.calls(), 1);
    }

    #[tokio::test]
    async fn test_leak_is_recorded_not_corrected() {
        let odd = odd_one().to_string();
        let players = seats()
            .into_iter()
            .map(|p| {
                let me = p.id.to_string();
                let odd = odd.clone();
                let actor = FnActor::new(&me.clone(), move |ctx| match ctx.phase {
                    Phase::Vote(_) => Ok(format!("VOTE: {}", if me == odd { "Agent 9" } else { odd.as_str() })),
                    _ if me == odd => Ok("Mine is a pear, oops.".to_string()),
                    _ => Ok("Round and sweet.".to_string()),
                });
                (p, actor as Arc<dyn Actor>)
            })
            .collect();

        let result = RunGameUseCase::new()
            .with_params(params())
            .start_session(RunGameInput::new(players, words(), 1))
            .await
            .unwrap();

        assert_eq!(
            result.violations,
            vec![ProtocolViolation::LeakedPrivateValue {
                participant: odd_one(),
                round: 1
            }]
        );
        // The turn is kept as spoken
        assert!(
            result
                .log
                .public_transcript()
                .iter()
                .any(|u| u.content.contains("pear"))
        );
        // The odd one's unusable ballot became an abstention; 2 of 2 still decide
        assert_eq!(result.outcome, GameOutcome::MajorityWins);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_round() {
        let token = CancellationToken::new();
        token.cancel();
        let result = RunGameUseCase::new()
            .with_params(params())
            .with_cancellation(token)
            .start_session(RunGameInput::new(accurate_players(), words(), 3))
            .await
            .unwrap();

        assert_eq!(result.outcome, GameOutcome::aborted("cancelled"));
        assert_eq!(result.rounds_played(), 0);
        assert!(result.assignment.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_deadline() {
        let players = seats()
            .into_iter()
            .map(|p| (p, Arc::new(Stalled) as Arc<dyn Actor>))
            .collect();

        let result = RunGameUseCase::new()
            .with_params(
                params()
                    .with_turn_timeout(None)
                    .with_session_timeout(Some(Duration::from_secs(30))),
            )
            .start_session(RunGameInput::new(players, words(), 3))
            .await
            .unwrap();

        assert_eq!(result.outcome, GameOutcome::aborted("session timed out"));
        assert_eq!(result.rounds_played(), 1);
        assert!(result.log.is_empty());
    }

    #[tokio::test]
    async fn test_history_saved_each_round_and_at_end() {
        let history = Arc::new(RecordingHistory::default());
        let result = RunGameUseCase::new()
            .with_params(params())
            .with_history(history.clone())
            .start_session(
                RunGameInput::new(scattered_players(), words(), 2)
                    .with_session_id(SessionId::new("s-1")),
            )
            .await
            .unwrap();

        assert_eq!(history.saves.lock().unwrap().len(), 3);
        let stored = history.load(&SessionId::new("s-1")).await.unwrap().unwrap();
        assert_eq!(stored, result.log);
    }

    #[tokio::test]
    async fn test_resumed_session_keeps_earlier_entries() {
        let history = Arc::new(RecordingHistory::default());
        let use_case = RunGameUseCase::new()
            .with_params(params())
            .with_history(history.clone());
        let id = SessionId::new("s-1");

        let first = use_case
            .start_session(
                RunGameInput::new(scattered_players(), words(), 1).with_session_id(id.clone()),
            )
            .await
            .unwrap();
        assert_eq!(first.log.len(), 6);

        let prompts: Arc<Mutex<Vec<String>>> = Arc::default();
        let players = seats()
            .into_iter()
            .map(|p| {
                let prompts = Arc::clone(&prompts);
                let actor = FnActor::new(p.id.as_str(), move |ctx| {
                    prompts.lock().unwrap().push(ctx.prompt.clone());
                    match ctx.phase {
                        Phase::Vote(_) => Ok("VOTE: nobody".to_string()),
                        _ => Ok("Second visit.".to_string()),
                    }
                });
                (p, actor as Arc<dyn Actor>)
            })
            .collect();

        let second = use_case
            .start_session(RunGameInput::new(players, words(), 1).with_session_id(id.clone()))
            .await
            .unwrap();

        // The first run's entries survive, the second run appends after them
        assert_eq!(&second.log.entries()[..6], first.log.entries());
        assert_eq!(second.log.len(), 12);
        let seqs: Vec<u64> = second.log.entries().iter().map(|e| e.seq()).collect();
        assert_eq!(seqs, (1..=12).collect::<Vec<_>>());
        assert_eq!(second.rounds_played(), 1);
        assert_eq!(second.last_round().unwrap().number, 2);

        let stored = history.load(&id).await.unwrap().unwrap();
        assert_eq!(stored, second.log);

        // The opening speaker sees the last three earlier utterances
        let opening = &prompts.lock().unwrap()[0];
        assert_eq!(opening.matches("It grows on trees.").count(), 3);
    }

    /// Store whose reads fail but whose writes succeed
    #[derive(Default)]
    struct UnreadableHistory {
        saves: AtomicUsize,
    }

    #[async_trait]
    impl HistoryStore for UnreadableHistory {
        async fn load(&self, _id: &SessionId) -> Result<Option<ContextLog>, HistoryError> {
            Err(HistoryError::Io("permission denied".into()))
        }

        async fn save(&self, _log: &ContextLog) -> Result<(), HistoryError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn list(&self) -> Result<Vec<SessionId>, HistoryError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_unreadable_history_is_never_overwritten() {
        let history = Arc::new(UnreadableHistory::default());
        let result = RunGameUseCase::new()
            .with_params(params())
            .with_history(history.clone())
            .start_session(
                RunGameInput::new(accurate_players(), words(), 1)
                    .with_session_id(SessionId::new("s-1")),
            )
            .await
            .unwrap();

        assert_eq!(result.outcome, GameOutcome::MajorityWins);
        assert_eq!(history.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_history_failure_does_not_abort() {
        let result = RunGameUseCase::new()
            .with_params(params())
            .with_history(Arc::new(FailingHistory))
            .start_session(RunGameInput::new(accurate_players(), words(), 1))
            .await
            .unwrap();
        assert_eq!(result.outcome, GameOutcome::MajorityWins);
    }

    #[tokio::test]
    async fn test_conversation_events() {
        let logger = Arc::new(RecordingLogger::default());
        RunGameUseCase::new()
            .with_params(params())
            .with_conversation_logger(logger.clone())
            .start_session(RunGameInput::new(accurate_players(), words(), 1))
            .await
            .unwrap();

        let events = logger.events.lock().unwrap();
        assert_eq!(events.first().map(String::as_str), Some("session_started"));
        assert_eq!(events.iter().filter(|e| *e == "turn").count(), 3);
        assert_eq!(events.iter().filter(|e| *e == "vote").count(), 3);
        assert!(events.iter().any(|e| e == "round_evaluated"));
        assert_eq!(events.last().map(String::as_str), Some("session_concluded"));
    }

    #[test]
    fn test_domain_error_mapping() {
        assert!(matches!(
            RunGameError::from(DomainError::ZeroRounds),
            RunGameError::Configuration(_)
        ));
        assert!(matches!(
            RunGameError::from(DomainError::Cancelled),
            RunGameError::Protocol(_)
        ));
    }

    #[test]
    fn test_concluded_status() {
        let mut s = GameSession::new(SessionId::new("x"), Roster::new(seats()).unwrap());
        s.conclude(GameOutcome::aborted("cancelled")).unwrap();
        assert_eq!(s.status(), SessionStatus::Concluded);
    }
}
