use crate::logging::SharedLogStore;
use crossterm::event::{Event as CtEvent, KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use stockdash_application::config::UiConfig;
use stockdash_application::dashboard::{DashboardSession, Selection, Trigger};
use stockdash_application::layout::{build_layout, LayoutDescriptor};
use stockdash_domain::repositories::tick_source::TickSource;
use stockdash_domain::value_objects::stock::Stock;

pub enum AppEvent {
    Input(CtEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Stock,
    ChartType,
    Theme,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Stock => Focus::ChartType,
            Focus::ChartType => Focus::Theme,
            Focus::Theme => Focus::Stock,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Stock => Focus::Theme,
            Focus::ChartType => Focus::Stock,
            Focus::Theme => Focus::ChartType,
        }
    }
}

pub struct App {
    pub layout: LayoutDescriptor,
    pub session: DashboardSession,
    source: Arc<dyn TickSource + Send + Sync>,
    pub focus: Focus,

    pub logs: SharedLogStore,
    pub log_scroll: usize,
    seen_log_generation: u64,

    pub dirty: bool,
}

impl App {
    /// Builds the layout from a first dataset and renders the initial charts.
    pub fn start(
        ui: &UiConfig,
        source: Arc<dyn TickSource + Send + Sync>,
        logs: SharedLogStore,
    ) -> Result<Self, String> {
        let initial = source.generate()?;
        let layout = build_layout(&initial, ui)?;
        let mut app = Self {
            layout,
            session: DashboardSession::new(Selection::from_ui(ui)),
            source,
            focus: Focus::Stock,
            logs,
            log_scroll: 0,
            seen_log_generation: 0,
            dirty: true,
        };
        app.refresh(Trigger::Initial)?;
        Ok(app)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.layout.interval.interval_ms)
    }

    pub fn spawn_input_reader(&self, tx: tokio::sync::mpsc::UnboundedSender<AppEvent>) {
        std::thread::spawn(move || {
            while let Ok(event) = crossterm::event::read() {
                if tx.send(AppEvent::Input(event)).is_err() {
                    break;
                }
            }
        });
    }

    pub fn on_tick(&mut self) {
        let generation = self.logs.lock().generation();
        if generation != self.seen_log_generation {
            self.seen_log_generation = generation;
            self.dirty = true;
        }
    }

    pub fn on_interval(&mut self) -> Result<(), String> {
        let trigger = self.session.tick();
        self.refresh(trigger)
    }

    pub fn on_event(&mut self, event: AppEvent) -> Result<bool, String> {
        match event {
            AppEvent::Input(CtEvent::Key(key)) => self.on_key(key),
            AppEvent::Input(CtEvent::Resize(_, _)) => {
                self.dirty = true;
                Ok(false)
            }
            AppEvent::Input(_) => Ok(false),
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> Result<bool, String> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Tab => {
                self.focus = self.focus.next();
                self.dirty = true;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                self.dirty = true;
            }
            KeyCode::Up => self.change_focused(false)?,
            KeyCode::Down => self.change_focused(true)?,
            KeyCode::PageUp => {
                let stored = self.logs.lock().line_count();
                self.log_scroll = self.log_scroll.saturating_add(3).min(stored);
                self.dirty = true;
            }
            KeyCode::PageDown => {
                self.log_scroll = self.log_scroll.saturating_sub(3);
                self.dirty = true;
            }
            _ => {}
        }
        Ok(false)
    }

    fn change_focused(&mut self, forward: bool) -> Result<(), String> {
        let selection = self.session.selection();
        let trigger = match self.focus {
            Focus::Stock => {
                let stock = cycle_stock(&self.layout.stocks, selection.stock, forward);
                self.session.select_stock(stock)
            }
            Focus::ChartType => {
                let chart_type = if forward {
                    selection.chart_type.next()
                } else {
                    selection.chart_type.prev()
                };
                self.session.select_chart_type(chart_type)
            }
            Focus::Theme => {
                self.session.select_theme(selection.theme.toggle());
                None
            }
        };
        self.dirty = true;
        match trigger {
            Some(trigger) => self.refresh(trigger),
            None => Ok(()),
        }
    }

    fn refresh(&mut self, trigger: Trigger) -> Result<(), String> {
        self.session.refresh(self.source.as_ref(), trigger)?;
        self.dirty = true;
        Ok(())
    }
}

fn cycle_stock(options: &[Stock], current: Stock, forward: bool) -> Stock {
    if options.is_empty() {
        return current;
    }
    let idx = options.iter().position(|s| *s == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % options.len()
    } else {
        (idx + options.len() - 1) % options.len()
    };
    options[next]
}

#[cfg(test)]
mod tests {
    use super::{cycle_stock, App, AppEvent, Focus};
    use crate::logging::LogStore;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use std::sync::Arc;
    use stockdash_application::config::UiConfig;
    use stockdash_domain::value_objects::chart_type::ChartType;
    use stockdash_domain::value_objects::figure::FigureKind;
    use stockdash_domain::value_objects::stock::Stock;
    use stockdash_domain::value_objects::theme::Theme;
    use stockdash_infrastructure::market_data::random::RandomTickSource;

    fn make_app() -> App {
        App::start(
            &UiConfig::default(),
            Arc::new(RandomTickSource::with_seed(11)),
            LogStore::shared(10),
        )
        .expect("app")
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.on_event(AppEvent::Input(Event::Key(KeyEvent::new(
            code,
            KeyModifiers::NONE,
        ))))
        .expect("key")
    }

    #[test]
    fn start_renders_initial_charts() {
        let app = make_app();
        assert_eq!(app.session.refreshes(), 1);
        let bundle = app.session.bundle().expect("bundle");
        assert_eq!(bundle.price.kind(), FigureKind::Bar);
        assert_eq!(bundle.price.title, "Apple Price Trend");
    }

    #[test]
    fn arrow_keys_change_stock_and_chart_type() {
        let mut app = make_app();
        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.selection().stock, Stock::Meta);
        assert_eq!(app.session.refreshes(), 2);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::ChartType);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.session.selection().chart_type, ChartType::Candlestick);
        let bundle = app.session.bundle().expect("bundle");
        assert_eq!(bundle.price.title, "Meta Candlestick Chart");
        assert_eq!(app.session.refreshes(), 3);
    }

    #[test]
    fn theme_change_does_not_refresh() {
        let mut app = make_app();
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::Theme);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.selection().theme, Theme::Dark);
        assert_eq!(app.session.refreshes(), 1);
    }

    #[test]
    fn interval_regenerates_with_timer_trigger() {
        let mut app = make_app();
        let before = app.session.dataset().cloned();
        app.on_interval().expect("interval");
        assert_eq!(app.session.n_intervals(), 1);
        assert_ne!(app.session.dataset().cloned(), before);
    }

    #[test]
    fn quit_keys_end_the_loop() {
        let mut app = make_app();
        assert!(press(&mut app, KeyCode::Char('q')));
        let ctrl_c = AppEvent::Input(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.on_event(ctrl_c).expect("ctrl-c"));
    }

    #[test]
    fn page_keys_scroll_logs() {
        let mut app = make_app();
        app.logs
            .lock()
            .extend((0..7).map(|i| format!("event {i}")));
        press(&mut app, KeyCode::PageUp);
        press(&mut app, KeyCode::PageUp);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.log_scroll, 3);
    }

    #[test]
    fn log_scroll_stops_at_oldest_line() {
        let mut app = make_app();
        app.logs.lock().push_line("only line");
        press(&mut app, KeyCode::PageUp);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.log_scroll, 1);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.log_scroll, 0);
    }

    #[test]
    fn new_log_lines_mark_app_dirty() {
        let mut app = make_app();
        app.dirty = false;
        app.on_tick();
        assert!(!app.dirty);
        app.logs.lock().push_line("charts rebuilt");
        app.on_tick();
        assert!(app.dirty);
    }

    #[test]
    fn stock_cycle_wraps_both_ways() {
        let options = Stock::ALL.to_vec();
        assert_eq!(cycle_stock(&options, Stock::Tesla, true), Stock::Apple);
        assert_eq!(cycle_stock(&options, Stock::Apple, false), Stock::Tesla);
        assert_eq!(cycle_stock(&[], Stock::Meta, true), Stock::Meta);
    }
}
