//! Session orchestration
//!
//! Owns one session from `create_session` to `report_result`: the game state,
//! the input channel, the tick and elapsed-time tasks, and the terminal report.

use super::api::{GameApi, GameResult, Level, PlayerId, SessionId};
use super::scheduler::{Scheduler, TaskId};
use crate::consts::ELAPSED_TIMER_MS;
use crate::error::SnakeError;
use crate::input::{InputAction, InputController, InputSender};
use crate::sim::{EndReason, GamePhase, GameState, GridLayout, TickOutcome, scaled_obstacle_count, tick};

/// Per-session identity and geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: SessionId,
    pub player_id: PlayerId,
    pub level: Level,
    pub layout: GridLayout,
}

/// Outcome of the single result report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportStatus {
    Reported,
    /// Logged and swallowed; the session still ends normally
    Failed(String),
}

/// Final state shown on the end screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub reason: EndReason,
    pub result: GameResult,
    pub report: ReportStatus,
}

/// Level-specific win rule, checked after every surviving tick
pub type WinCondition = fn(&GameState) -> bool;

/// Drives one session
pub struct SessionCoordinator<A: GameApi> {
    api: A,
    context: SessionContext,
    state: GameState,
    input: InputController,
    sender: InputSender,
    scheduler: Scheduler,
    tick_task: Option<TaskId>,
    timer_task: Option<TaskId>,
    now_ms: u64,
    win_condition: Option<WinCondition>,
    summary: Option<SessionSummary>,
    redraw: bool,
}

impl<A: GameApi> SessionCoordinator<A> {
    /// Create the backend session, then build the board
    ///
    /// Obstacle density of the level's nominal grid is preserved on the fitted
    /// grid. A board that cannot be populated aborts the start.
    pub fn start(
        mut api: A,
        player_id: PlayerId,
        level: Level,
        layout: GridLayout,
        seed: u64,
    ) -> Result<Self, SnakeError> {
        let session_id = api.create_session(player_id, level.id)?;

        let obstacle_count =
            scaled_obstacle_count(&layout.grid, level.obstacle_count, level.nominal_area());
        let state = GameState::new(layout.grid, obstacle_count, seed).map_err(|err| {
            log::warn!("Session {} aborted: {}", session_id, err);
            err
        })?;

        log::info!(
            "Session {} created: level {} ({}), grid {}x{}, cell {}px, {} obstacles, seed {}",
            session_id,
            level.level_number,
            level.name,
            layout.grid.cols,
            layout.grid.rows,
            layout.cell_size,
            obstacle_count,
            seed
        );

        let (sender, input) = InputController::channel();
        Ok(Self {
            api,
            context: SessionContext {
                session_id,
                player_id,
                level,
                layout,
            },
            state,
            input,
            sender,
            scheduler: Scheduler::new(),
            tick_task: None,
            timer_task: None,
            now_ms: 0,
            win_condition: None,
            summary: None,
            redraw: true,
        })
    }

    /// Install a level-clear rule
    pub fn with_win_condition(mut self, condition: WinCondition) -> Self {
        self.win_condition = Some(condition);
        self
    }

    /// A new sending handle for the platform layer
    pub fn input_sender(&self) -> InputSender {
        self.sender.clone()
    }

    /// Apply queued input at `now_ms`, then run every firing due up to it
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        self.pump_input();

        while let Some((task, _)) = self.scheduler.pop_due(now_ms) {
            if Some(task) == self.tick_task {
                self.on_tick();
            } else if Some(task) == self.timer_task {
                self.state.advance_clock();
            }
        }
    }

    /// Apply all input received since the last call
    pub fn pump_input(&mut self) {
        for event in self.input.drain() {
            match InputController::apply(event, &mut self.state) {
                InputAction::Started => self.begin_running(),
                InputAction::PauseToggled(GamePhase::Paused) => self.suspend_tasks(),
                InputAction::PauseToggled(_) => self.resume_tasks(),
                InputAction::QuitRequested => self.end_session(EndReason::Quit),
                InputAction::DirectionBuffered
                | InputAction::DirectionRejected
                | InputAction::Ignored => {}
            }
        }
    }

    fn begin_running(&mut self) {
        let interval = self.context.level.tick_interval_ms;
        self.tick_task = Some(self.scheduler.schedule(interval, self.now_ms));
        self.timer_task = Some(self.scheduler.schedule(ELAPSED_TIMER_MS, self.now_ms));
        self.redraw = true;
        log::info!(
            "Session {} running ({}ms ticks)",
            self.context.session_id,
            interval
        );
    }

    fn suspend_tasks(&mut self) {
        for task in [self.tick_task, self.timer_task].into_iter().flatten() {
            self.scheduler.suspend(task, self.now_ms);
        }
        self.redraw = true;
        log::info!("Session {} paused", self.context.session_id);
    }

    fn resume_tasks(&mut self) {
        for task in [self.tick_task, self.timer_task].into_iter().flatten() {
            self.scheduler.resume(task, self.now_ms);
        }
        self.redraw = true;
        log::info!("Session {} resumed", self.context.session_id);
    }

    fn on_tick(&mut self) {
        let outcome = tick(&mut self.state);
        self.redraw = true;

        match outcome {
            TickOutcome::Ended(reason) => self.end_session(reason),
            TickOutcome::Moved | TickOutcome::Ate { .. } => {
                if self.win_condition.is_some_and(|won| won(&self.state)) {
                    self.end_session(EndReason::LevelCleared);
                }
            }
            TickOutcome::Skipped => {}
        }
    }

    /// End the session (quit, win flows, collisions). Only the first call
    /// cancels the tasks and reports the result.
    pub fn end_session(&mut self, reason: EndReason) {
        if self.summary.is_some() {
            return;
        }
        self.state.end(reason);
        let reason = self.state.end_reason.unwrap_or(reason);

        for task in [self.tick_task.take(), self.timer_task.take()].into_iter().flatten() {
            self.scheduler.cancel(task);
        }

        let result = GameResult {
            score: self.state.score,
            food_eaten: self.state.food_eaten,
            elapsed_secs: self.state.elapsed_secs,
            completed: reason.completed(),
        };

        let session_id = self.context.session_id;
        let report = match self.api.report_result(session_id, &result) {
            Ok(()) => {
                log::debug!("Session {} result reported", session_id);
                ReportStatus::Reported
            }
            Err(err) => {
                log::warn!("Failed to report session {} result: {}", session_id, err);
                ReportStatus::Failed(err.to_string())
            }
        };

        if reason.is_collision() {
            log::info!("Session {} crashed: {:?}", session_id, reason);
        }
        log::info!(
            "Session {} ended ({:?}): score {}, food {}, {}s",
            session_id,
            reason,
            result.score,
            result.food_eaten,
            result.elapsed_secs
        );

        self.summary = Some(SessionSummary {
            session_id,
            reason,
            result,
            report,
        });
        self.redraw = true;
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.summary.is_some()
    }

    /// True while either periodic task is alive
    pub fn has_active_tasks(&self) -> bool {
        !self.scheduler.is_empty()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// True once per state change; the frame loop repaints on true
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw)
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::input::InputEvent;
    use crate::leaderboard::LeaderboardEntry;
    use crate::session::api::{LevelId, Player, default_levels};
    use crate::session::memory::InMemoryApi;
    use crate::sim::{Direction, Grid};

    /// Counts reports on top of the in-memory backend
    #[derive(Default)]
    struct RecordingApi {
        inner: InMemoryApi,
        reports: Vec<(SessionId, GameResult)>,
    }

    impl GameApi for RecordingApi {
        fn create_player(&mut self, username: &str, email: &str) -> Result<Player, ApiError> {
            self.inner.create_player(username, email)
        }

        fn find_player(&self, username: &str) -> Result<Player, ApiError> {
            self.inner.find_player(username)
        }

        fn fetch_level_catalog(&self) -> Result<Vec<Level>, ApiError> {
            self.inner.fetch_level_catalog()
        }

        fn create_session(
            &mut self,
            player_id: PlayerId,
            level_id: LevelId,
        ) -> Result<SessionId, ApiError> {
            self.inner.create_session(player_id, level_id)
        }

        fn report_result(
            &mut self,
            session_id: SessionId,
            result: &GameResult,
        ) -> Result<(), ApiError> {
            self.reports.push((session_id, *result));
            self.inner.report_result(session_id, result)
        }

        fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ApiError> {
            self.inner.leaderboard(limit)
        }
    }

    fn level(tick_ms: u64, obstacles: u32) -> Level {
        Level {
            tick_interval_ms: tick_ms,
            obstacle_count: obstacles,
            ..default_levels()[0].clone()
        }
    }

    /// 10x10 board, snake head at (5,5) facing right
    fn start_session(level: Level) -> SessionCoordinator<RecordingApi> {
        let mut api = RecordingApi::default();
        let player = api.create_player("tester", "tester@example.com").unwrap();
        let layout = GridLayout::fit(200, 200, 20, 15);
        SessionCoordinator::start(api, player.id, level, layout, 42).unwrap()
    }

    #[test]
    fn test_idle_until_first_direction() {
        let mut session = start_session(level(100, 0));
        session.advance_to(5_000);
        assert_eq!(session.state().phase, GamePhase::Idle);
        assert_eq!(session.state().time_ticks, 0);
        assert!(!session.has_active_tasks());
    }

    #[test]
    fn test_ticks_follow_level_interval() {
        let mut session = start_session(level(100, 0));
        session.advance_to(1_000);
        session.input_sender().send(InputEvent::Direction(Direction::Up));
        session.advance_to(1_000);

        session.advance_to(1_099);
        assert_eq!(session.state().time_ticks, 0);
        session.advance_to(1_300);
        assert_eq!(session.state().time_ticks, 3);
        assert_eq!(session.state().snake.head().y, 2);
        assert_eq!(session.state().elapsed_secs, 0);
    }

    #[test]
    fn test_first_key_after_idle_gap() {
        let mut session = start_session(level(100, 0));
        session.advance_to(0);

        // Key pressed late in a long frame gap: the first tick is one
        // interval after the key, not a burst covering the idle time
        session.input_sender().send(InputEvent::Direction(Direction::Up));
        session.advance_to(5_000);
        assert_eq!(session.state().phase, GamePhase::Running);
        assert_eq!(session.state().time_ticks, 0);
        assert_eq!(session.state().elapsed_secs, 0);

        session.advance_to(5_100);
        assert_eq!(session.state().time_ticks, 1);
        assert_eq!(session.state().snake.head().y, 4);
    }

    #[test]
    fn test_elapsed_seconds_counted() {
        let mut session = start_session(level(500, 0));
        session.input_sender().send(InputEvent::Direction(Direction::Down));
        session.advance_to(0);

        // Head reaches the bottom row (5,9) on the fourth tick
        session.advance_to(2_000);
        assert_eq!(session.state().phase, GamePhase::Running);
        assert_eq!(session.state().time_ticks, 4);
        assert_eq!(session.state().elapsed_secs, 2);
    }

    #[test]
    fn test_pause_suspends_ticks_and_timer() {
        let mut session = start_session(level(100, 0));
        let tx = session.input_sender();
        tx.send(InputEvent::Direction(Direction::Up));
        session.advance_to(0);
        session.advance_to(250);
        assert_eq!(session.state().time_ticks, 2);

        tx.send(InputEvent::PauseToggle);
        session.advance_to(250);
        session.advance_to(10_000);
        assert_eq!(session.state().phase, GamePhase::Paused);
        assert_eq!(session.state().time_ticks, 2);
        assert_eq!(session.state().elapsed_secs, 0);

        // 50ms were left in the tick period when paused
        tx.send(InputEvent::PauseToggle);
        session.advance_to(10_000);
        session.advance_to(10_049);
        assert_eq!(session.state().time_ticks, 2);
        session.advance_to(10_050);
        assert_eq!(session.state().time_ticks, 3);
        assert_eq!(session.now_ms(), 10_050);
    }

    #[test]
    fn test_repeated_pause_keeps_session_paused() {
        let mut session = start_session(level(100, 0));
        let tx = session.input_sender();
        tx.send(InputEvent::Direction(Direction::Up));
        session.advance_to(0);
        session.advance_to(100);
        assert_eq!(session.state().time_ticks, 1);

        // Blur and visibility change can both fire for one tab switch
        tx.send(InputEvent::Pause);
        tx.send(InputEvent::Pause);
        session.advance_to(150);
        session.advance_to(10_000);
        assert_eq!(session.state().phase, GamePhase::Paused);
        assert_eq!(session.state().time_ticks, 1);
        assert!(!session.is_over());
    }

    #[test]
    fn test_saturated_board_aborts_start() {
        let mut api = RecordingApi::default();
        let layout = GridLayout::fit(200, 200, 20, 15);
        let player = api.create_player("tester", "tester@example.com").unwrap();
        let err = SessionCoordinator::start(api, player.id, level(100, 1_000), layout, 1).err();
        assert!(matches!(err, Some(SnakeError::GridSaturated { .. })));
    }

    #[test]
    fn test_wall_collision_reports_once() {
        let mut session = start_session(level(100, 0));
        session.input_sender().send(InputEvent::Direction(Direction::Up));
        session.advance_to(0);

        // Head at row 5 dies on the sixth tick
        session.advance_to(60_000);
        assert!(session.is_over());
        assert!(!session.has_active_tasks());

        let summary = session.summary().unwrap().clone();
        assert_eq!(summary.reason, EndReason::WallCollision);
        assert_eq!(summary.report, ReportStatus::Reported);
        assert!(!summary.result.completed);
        assert_eq!(session.state().time_ticks, 6);

        // Later quits change nothing
        session.input_sender().send(InputEvent::Quit);
        session.advance_to(70_000);
        session.end_session(EndReason::Quit);
        assert_eq!(session.api().reports.len(), 1);
        assert_eq!(session.api().reports[0].0, summary.session_id);
    }

    #[test]
    fn test_quit_reports_incomplete() {
        let mut session = start_session(level(500, 0));
        let tx = session.input_sender();
        tx.send(InputEvent::Direction(Direction::Down));
        session.advance_to(0);
        session.advance_to(1_000);
        tx.send(InputEvent::Quit);
        session.advance_to(1_000);

        let summary = session.summary().unwrap();
        assert_eq!(summary.reason, EndReason::Quit);
        assert_eq!(summary.result.elapsed_secs, 1);
        assert!(!summary.result.completed);
    }

    #[test]
    fn test_reporting_failure_is_swallowed() {
        let mut api = InMemoryApi::default();
        let player = api.create_player("tester", "tester@example.com").unwrap();
        let layout = GridLayout::fit(200, 200, 20, 15);
        api.set_fail_reports(true);
        let mut session =
            SessionCoordinator::start(&mut api, player.id, level(100, 0), layout, 1).unwrap();

        session.input_sender().send(InputEvent::Direction(Direction::Up));
        session.advance_to(0);
        session.advance_to(10_000);

        let summary = session.summary().unwrap();
        assert!(matches!(summary.report, ReportStatus::Failed(_)));
        assert_eq!(session.state().phase, GamePhase::Ended);
    }

    #[test]
    fn test_win_condition_hook() {
        let mut session = start_session(level(100, 0)).with_win_condition(|s| s.time_ticks >= 2);
        session.input_sender().send(InputEvent::Direction(Direction::Up));
        session.advance_to(0);
        session.advance_to(1_000);

        let summary = session.summary().unwrap();
        assert_eq!(summary.reason, EndReason::LevelCleared);
        assert!(summary.result.completed);
        assert_eq!(session.state().time_ticks, 2);
    }

    #[test]
    fn test_obstacles_scaled_to_fitted_grid() {
        // Nominal 20x20 with 10 obstacles on a 30x15 board
        let mut lvl = level(100, 10);
        lvl.nominal_grid_size = 20;
        let mut api = RecordingApi::default();
        let player = api.create_player("tester", "tester@example.com").unwrap();
        let layout = GridLayout::fit(600, 300, 20, 15);
        assert_eq!(layout.grid, Grid::new(30, 15));

        let session = SessionCoordinator::start(api, player.id, lvl, layout, 9).unwrap();
        assert_eq!(session.state().obstacles.len(), 11);
    }

    #[test]
    fn test_start_requires_known_player() {
        let api = RecordingApi::default();
        let layout = GridLayout::fit(200, 200, 20, 15);
        let err = SessionCoordinator::start(api, 5, level(100, 0), layout, 1).err();
        assert!(matches!(err, Some(SnakeError::Api(ApiError::PlayerNotFound))));
    }

    #[test]
    fn test_redraw_flag() {
        let mut session = start_session(level(100, 0));
        assert!(session.take_redraw());
        assert!(!session.take_redraw());
        session.input_sender().send(InputEvent::Direction(Direction::Up));
        session.advance_to(100);
        assert!(session.take_redraw());
    }
}
