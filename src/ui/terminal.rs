use {
    crate::state::State,
    ratatui::{backend::CrosstermBackend, Terminal},
    std::{sync::Arc, time::Duration},
    tokio::sync::RwLock,
};

/// Presentation-side view state: which log position is selected and
/// whether the detail overlay is open. Never mutates the event log.
#[derive(Debug, Default)]
pub struct UiView {
    /// Offset from the newest event (0 = newest row)
    pub selected_offset: usize,
    pub detail_open: bool,
}

impl UiView {
    /// Absolute log index of the selection, None while the log is empty
    pub fn selected_index(&self, event_count: usize) -> Option<usize> {
        if event_count == 0 {
            return None;
        }
        let offset = self.selected_offset.min(event_count - 1);
        Some(event_count - 1 - offset)
    }
}

/// Run the TUI event loop
///
/// Re-renders from a read snapshot of the shared state on a fixed tick and
/// handles keyboard input between frames.
pub async fn run_ui(state: Arc<RwLock<State>>) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    crossterm::terminal::enable_raw_mode()?;

    // Alternate screen isolates the dashboard from stderr logging
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    )?;

    terminal.clear()?;

    let refresh_interval = Duration::from_millis(250);
    let mut view = UiView::default();

    loop {
        if crossterm::event::poll(refresh_interval)? {
            if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
                match key.code {
                    crossterm::event::KeyCode::Char('q') => break,
                    crossterm::event::KeyCode::Esc => {
                        if view.detail_open {
                            view.detail_open = false;
                        } else {
                            break;
                        }
                    }
                    // the table is newest-first, so Down walks toward older events
                    crossterm::event::KeyCode::Down => {
                        view.selected_offset = view.selected_offset.saturating_add(1);
                    }
                    crossterm::event::KeyCode::Up => {
                        view.selected_offset = view.selected_offset.saturating_sub(1);
                    }
                    crossterm::event::KeyCode::Enter => {
                        view.detail_open = !view.detail_open;
                    }
                    _ => {}
                }
            }
        }

        {
            let state = state.read().await;

            // clamp the selection as the log grows or stays empty
            let count = state.event_count();
            if count > 0 {
                view.selected_offset = view.selected_offset.min(count - 1);
            } else {
                view.selected_offset = 0;
                view.detail_open = false;
            }

            terminal.draw(|f| {
                let area = f.size();
                crate::ui::layout::render_layout(f, area, &state, &view);
            })?;
        }
    }

    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    crossterm::terminal::disable_raw_mode()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_index_maps_offset_from_newest() {
        let view = UiView {
            selected_offset: 0,
            detail_open: false,
        };
        assert_eq!(view.selected_index(5), Some(4));

        let view = UiView {
            selected_offset: 2,
            detail_open: false,
        };
        assert_eq!(view.selected_index(5), Some(2));
    }

    #[test]
    fn test_selected_index_empty_and_clamped() {
        let view = UiView {
            selected_offset: 0,
            detail_open: false,
        };
        assert_eq!(view.selected_index(0), None);

        let view = UiView {
            selected_offset: 99,
            detail_open: false,
        };
        assert_eq!(view.selected_index(3), Some(0));
    }
}
