use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::EnableBracketedPaste;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::Backend;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Constraint;
use ratatui::layout::Direction as LayoutDirection;
use ratatui::layout::Layout;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tui_textarea::Key;
use tui_textarea::TextArea;

use crate::domain::models::Action;
use crate::domain::models::Direction;
use crate::domain::models::Event;
use crate::domain::models::Route;
use crate::domain::services::AppState;
use crate::domain::services::EventsService;

fn input_block(title: &str) -> Block {
    return Block::default().borders(Borders::ALL).title(title.to_string());
}

fn error_line(state: &AppState) -> Line {
    if let Some(error) = &state.error {
        return Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        ));
    }
    if state.loading {
        return Line::from(Span::styled(
            "Carregando...",
            Style::default().fg(Color::DarkGray),
        ));
    }
    return Line::from("");
}

fn render_login<B: Backend>(frame: &mut Frame<B>, state: &AppState, textarea: &TextArea) {
    let layout = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints(vec![
            Constraint::Min(1),
            Constraint::Max(3),
            Constraint::Max(1),
        ])
        .split(frame.size());

    let title = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Blip Desk",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Informe a chave de API e pressione Enter."),
    ]);
    frame.render_widget(title, layout[0]);
    frame.render_widget(textarea.widget(), layout[1]);
    frame.render_widget(Paragraph::new(error_line(state)), layout[2]);
}

fn render_contacts<B: Backend>(frame: &mut Frame<B>, state: &AppState) {
    let layout = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints(vec![
            Constraint::Max(1),
            Constraint::Min(1),
            Constraint::Max(1),
            Constraint::Max(1),
        ])
        .split(frame.size());

    let header = format!(
        "Lista de Contatos — Página {} de {}",
        state.page, state.total_pages
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            header,
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        layout[0],
    );

    if state.contacts.is_empty() && !state.loading {
        frame.render_widget(
            Paragraph::new("Nenhum contato encontrado."),
            layout[1],
        );
    } else {
        let items = state
            .contacts
            .iter()
            .map(|contact| {
                return ListItem::new(format!("{} <{}>", contact.name, contact.identity));
            })
            .collect::<Vec<ListItem>>();

        let mut list_state = ListState::default();
        list_state.select(Some(state.selected));

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, layout[1], &mut list_state);
    }

    frame.render_widget(Paragraph::new(error_line(state)), layout[2]);

    let mut footer = vec![];
    if state.page > 1 {
        footer.push("← Anterior");
    }
    if state.page < state.total_pages {
        footer.push("→ Próxima");
    }
    footer.push("Enter Abrir conversa");
    footer.push("l Logout");
    footer.push("Ctrl+C Sair");
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            footer.join("  "),
            Style::default().fg(Color::DarkGray),
        ))),
        layout[3],
    );
}

fn render_chat<B: Backend>(frame: &mut Frame<B>, state: &AppState, textarea: &TextArea) {
    let layout = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints(vec![
            Constraint::Max(1),
            Constraint::Min(1),
            Constraint::Max(3),
            Constraint::Max(1),
        ])
        .split(frame.size());

    let contact = state
        .session
        .selected_contact
        .clone()
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("Conversa com {contact}"),
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        layout[0],
    );

    if state.messages.is_empty() && !state.loading {
        frame.render_widget(
            Paragraph::new("Nenhuma mensagem encontrada."),
            layout[1],
        );
    } else {
        let width = layout[1].width as usize;
        let items = state
            .messages
            .iter()
            .map(|message| {
                let line = match message.direction {
                    Direction::Sent => {
                        // Right aligned by hand, ratatui lists have no
                        // per-item alignment.
                        let text = format!("{} ◄", message.message);
                        let pad = width.saturating_sub(text.chars().count());
                        Line::from(Span::styled(
                            format!("{}{text}", " ".repeat(pad)),
                            Style::default().fg(Color::Blue),
                        ))
                    }
                    Direction::Received => Line::from(Span::styled(
                        format!("► {}", message.message),
                        Style::default().fg(Color::Gray),
                    )),
                };
                return ListItem::new(line);
            })
            .collect::<Vec<ListItem>>();

        frame.render_widget(List::new(items), layout[1]);
    }

    frame.render_widget(textarea.widget(), layout[2]);
    let mut footer_spans = vec![Span::styled(
        "Enter Enviar  Esc Voltar  Ctrl+C Sair",
        Style::default().fg(Color::DarkGray),
    )];
    if state.error.is_some() || state.loading {
        footer_spans = vec![error_line(state).spans.remove(0)];
    }
    frame.render_widget(Paragraph::new(Line::from(footer_spans)), layout[3]);
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    tx: mpsc::UnboundedSender<Action>,
    events: &mut EventsService,
) -> Result<()> {
    let mut textarea = TextArea::default();
    textarea.set_block(input_block("Chave de API"));

    loop {
        terminal.draw(|frame| {
            match &app_state.route {
                Route::Login => render_login(frame, app_state, &textarea),
                Route::Contacts => render_contacts(frame, app_state),
                Route::Chat(_) => render_chat(frame, app_state, &textarea),
            };
        })?;

        let dispatch = |action: Option<Action>| -> Result<()> {
            if let Some(action) = action {
                tx.send(action)?;
            }
            return Ok(());
        };

        match events.next().await? {
            Event::KeyboardCTRLC() => break,
            Event::UITick() => continue,
            Event::KeyboardCharInput(input) => match app_state.route {
                Route::Contacts => {
                    if let Key::Char('l') = input.key {
                        dispatch(Some(Action::Logout()))?;
                    }
                }
                _ => {
                    textarea.input(input);
                }
            },
            Event::KeyboardPaste(text) => {
                if app_state.route != Route::Contacts {
                    textarea.insert_str(&text);
                }
            }
            Event::KeyboardEnter() => match &app_state.route {
                Route::Login => {
                    let key = textarea.lines().join("");
                    if !key.trim().is_empty() {
                        app_state.loading = true;
                        app_state.error = None;
                        dispatch(Some(Action::VerifyKey(key.trim().to_string())))?;
                    }
                }
                Route::Contacts => {
                    if let Some(contact) = app_state.selected_contact() {
                        let identity = contact.identity.to_string();
                        dispatch(app_state.navigate(Route::Chat(identity)))?;
                        textarea = TextArea::default();
                        textarea.set_block(input_block("Mensagem"));
                    }
                }
                Route::Chat(_) => {
                    let text = textarea.lines().join("\n");
                    if let Some(action) = app_state.compose_send(&text) {
                        dispatch(Some(action))?;
                        textarea = TextArea::default();
                        textarea.set_block(input_block("Mensagem"));
                    }
                }
            },
            Event::KeyboardEsc() => {
                if let Route::Chat(_) = app_state.route {
                    dispatch(app_state.navigate(Route::Contacts))?;
                }
            }
            Event::UIListUp() => app_state.list_up(),
            Event::UIListDown() => app_state.list_down(),
            Event::UIPagePrev() => dispatch(app_state.page_prev())?,
            Event::UIPageNext() => dispatch(app_state.page_next())?,
            Event::AuthAccepted() => {
                dispatch(app_state.handle_auth_accepted())?;
                textarea = TextArea::default();
                textarea.set_block(input_block("Mensagem"));
            }
            Event::AuthRejected(reason) => app_state.handle_auth_rejected(reason),
            Event::LoggedOut() => {
                app_state.handle_logged_out();
                textarea = TextArea::default();
                textarea.set_block(input_block("Chave de API"));
            }
            Event::ContactsLoaded { revision, page } => {
                app_state.handle_contacts_loaded(revision, page);
            }
            Event::ThreadLoaded {
                revision,
                contact_id,
                messages,
            } => {
                app_state.handle_thread_loaded(revision, &contact_id, messages);
            }
            Event::MessageStored { revision, message } => {
                app_state.handle_message_stored(revision, message);
            }
            Event::WorkerError { revision, message } => {
                app_state.handle_worker_error(revision, message);
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    disable_raw_mode().unwrap();
    crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste).unwrap();
    crossterm::execute!(io::stdout(), cursor::Show).unwrap();
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
    authenticated: bool,
) -> Result<()> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let mut app_state = AppState::new(authenticated);
    if authenticated {
        if let Some(action) = app_state.navigate(Route::Contacts) {
            tx.send(action)?;
        }
    }

    let mut events = EventsService::new(rx);
    start_loop(&mut terminal, &mut app_state, tx, &mut events).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
