pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{AppContext, Result, RoostError};
use crate::domain::{same_handle, FeedSnapshot};
use crate::feed::{FollowOutcome, RemoveOutcome, SYNC_PERIOD};
use crate::menu::MenuAction;
use crate::scheduler::{Scheduler, SyncStatus};
use crate::shell::{Resolution, Shell};

use self::app::{InputMode, MenuLevel, TuiApp};
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the menu with the periodic sync in the background.
pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    let scheduler = ctx.scheduler(SYNC_PERIOD);
    let sync_task = scheduler.clone().spawn();

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &ctx, &scheduler).await;
    restore_terminal(&mut terminal)?;

    scheduler.stop();
    sync_task.abort();
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: &AppContext, scheduler: &Scheduler) -> Result<()> {
    let shell = ctx.shell.as_ref();
    let mut tui_app = TuiApp::new(shell.title(), shell.root_menu());
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let mut last_snapshot = shell.current_state();
    let mut last_status = scheduler.last_status();

    loop {
        terminal.draw(|frame| layout::render(frame, &mut tui_app, &ctx.config.colors))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let mode = std::mem::replace(&mut tui_app.mode, InputMode::Normal);
                match mode {
                    InputMode::Follow { input } => {
                        handle_follow_input(terminal, ctx, &mut tui_app, key, input).await?;
                    }
                    InputMode::ConfirmRemove { handle } => {
                        if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                            remove(shell, &mut tui_app, &handle).await;
                        } else {
                            tui_app.set_status("Remove cancelled".to_string());
                        }
                    }
                    InputMode::Normal => {
                        let action = ctx.config.keybindings.get_action(&key);
                        handle_action(terminal, ctx, &mut tui_app, action).await?;
                    }
                }
            }
            AppEvent::Tick => {
                let status = scheduler.last_status();
                if status != last_status {
                    if let Some(message) = status.as_ref().map(describe_status) {
                        tui_app.set_status(message);
                    }
                    last_status = status;
                }
            }
        }

        // Menus are rebuilt whenever a sync, follow or remove changed the state.
        let snapshot = shell.current_state();
        if snapshot != last_snapshot {
            rebuild_menus(shell, &mut tui_app, &snapshot);
            last_snapshot = snapshot;
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

async fn handle_action(
    terminal: &mut Tui,
    ctx: &AppContext,
    tui_app: &mut TuiApp,
    action: Action,
) -> Result<()> {
    let shell = ctx.shell.as_ref();

    match action {
        Action::Quit => {
            tui_app.should_quit = true;
        }
        Action::MoveUp => tui_app.current_mut().move_up(),
        Action::MoveDown => tui_app.current_mut().move_down(),
        Action::NextPage => tui_app.current_mut().next_page(),
        Action::PrevPage => tui_app.current_mut().prev_page(),
        Action::Back => {
            if tui_app.pop() {
                tui_app.clear_status();
            }
        }
        Action::Select => {
            let Some(action) = tui_app.current().selected_action().cloned() else {
                return Ok(());
            };
            match action {
                MenuAction::Remove { handle } => {
                    tui_app.mode = InputMode::ConfirmRemove { handle };
                }
                action => {
                    let resolution = shell.resolve(&action).await;
                    match resolution {
                        Ok(Resolution::Submenu { title, items }) => {
                            tui_app.push(MenuLevel::new(title, Some(action), items));
                        }
                        Ok(Resolution::Opened { url }) => {
                            tui_app.set_status(format!("Opened {}", url));
                        }
                        Ok(Resolution::Removed(_)) => {}
                        Ok(Resolution::FollowRequested) => {
                            tui_app.mode = InputMode::Follow {
                                input: String::new(),
                            };
                        }
                        Err(e) => tui_app.set_status(format!("Error: {}", e)),
                    }
                }
            }
        }
        Action::OpenInBrowser => {
            if let Some(MenuAction::ShowPost { handle, id } | MenuAction::OpenPost { handle, id }) =
                tui_app.current().selected_action().cloned()
            {
                let url = shell.on_post_activated(&handle, &id);
                tui_app.set_status(format!("Opened {}", url));
            }
        }
        Action::Refresh => {
            tui_app.is_refreshing = true;
            terminal.draw(|frame| layout::render(frame, tui_app, &ctx.config.colors))?;

            let message = match shell.feeds().sync_all().await {
                Ok(report) if report.failed.is_empty() => {
                    format!("Refreshed {} accounts", report.refreshed)
                }
                Ok(report) => format!(
                    "Refreshed {} accounts, failed: {}",
                    report.refreshed,
                    report.failed.join(", ")
                ),
                Err(RoostError::RateLimited { last_attempt }) => format!(
                    "Last refresh was at {}, try again later",
                    last_attempt.with_timezone(&chrono::Local).format("%H:%M")
                ),
                Err(e) => format!("Error: {}", e),
            };

            tui_app.is_refreshing = false;
            tui_app.set_status(message);
        }
        Action::Follow => {
            tui_app.mode = InputMode::Follow {
                input: String::new(),
            };
        }
        Action::Remove => {
            if let Some(handle) = tui_app.selected_handle() {
                tui_app.mode = InputMode::ConfirmRemove { handle };
            }
        }
        Action::None => {}
    }

    Ok(())
}

async fn handle_follow_input(
    terminal: &mut Tui,
    ctx: &AppContext,
    tui_app: &mut TuiApp,
    key: KeyEvent,
    mut input: String,
) -> Result<()> {
    match key.code {
        KeyCode::Esc => {
            tui_app.set_status("Follow cancelled".to_string());
        }
        KeyCode::Enter => {
            tui_app.set_status(format!("Following @{}...", input.trim_start_matches('@')));
            terminal.draw(|frame| layout::render(frame, tui_app, &ctx.config.colors))?;

            let message = match ctx.shell.on_follow_requested(&input).await {
                Ok(FollowOutcome::Added { handle, posts }) => {
                    format!("Following @{} ({} posts)", handle, posts)
                }
                Ok(FollowOutcome::AlreadyTracked { handle }) => {
                    format!("Already following @{}", handle)
                }
                Err(e) => format!("Error: {}", e),
            };
            tui_app.set_status(message);
        }
        KeyCode::Backspace => {
            input.pop();
            tui_app.mode = InputMode::Follow { input };
        }
        KeyCode::Char(c) => {
            input.push(c);
            tui_app.mode = InputMode::Follow { input };
        }
        _ => {
            tui_app.mode = InputMode::Follow { input };
        }
    }
    Ok(())
}

async fn remove(shell: &Shell, tui_app: &mut TuiApp, handle: &str) {
    match shell.on_remove_requested(handle).await {
        Ok(RemoveOutcome::Removed { handle }) => {
            tui_app.close_account(&handle);
            tui_app.set_status(format!("Removed @{}", handle));
        }
        Ok(RemoveOutcome::NotTracked) => {
            tui_app.set_status(format!("Not following @{}", handle));
        }
        Err(e) => tui_app.set_status(format!("Error: {}", e)),
    }
}

fn rebuild_menus(shell: &Shell, tui_app: &mut TuiApp, snapshot: &FeedSnapshot) {
    tui_app.title = shell.title();
    for level in tui_app.stack.iter_mut() {
        let items = match &level.opened_by {
            None => shell.root_menu(),
            Some(action) => match shell.submenu(action) {
                Some((_, items)) => items,
                None => continue,
            },
        };
        level.replace_items(items);
    }

    // Submenus of accounts that are no longer tracked.
    let gone: Vec<String> = tui_app
        .stack
        .iter()
        .filter_map(|level| match &level.opened_by {
            Some(MenuAction::ShowAccount { handle })
                if !snapshot.handles.iter().any(|h| same_handle(h, handle)) =>
            {
                Some(handle.clone())
            }
            _ => None,
        })
        .collect();
    for handle in gone {
        tui_app.close_account(&handle);
    }
}

fn describe_status(status: &SyncStatus) -> String {
    match status {
        SyncStatus::Synced { at, report } => format!(
            "Synced {} accounts at {}",
            report.refreshed,
            at.with_timezone(&chrono::Local).format("%H:%M")
        ),
        SyncStatus::Skipped { .. } => "Background sync skipped, too soon".to_string(),
        SyncStatus::Failed { reason, .. } => format!("Error: {}", reason),
    }
}
