use barkada_agent::cli::ChatArgs;
use barkada_agent::config::WidgetConfig;
use barkada_agent::models::chat::Who;
use barkada_agent::widget::markdown::to_plain_text;
use barkada_agent::widget::storage::FileStore;
use barkada_agent::widget::transport::HttpTransport;
use barkada_agent::widget::view::ChatView;
use barkada_agent::widget::{ ChatWidget, PanelState };
use clap::Parser;
use dotenv::dotenv;
use log::info;
use std::error::Error;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{ AsyncBufReadExt, BufReader };

/// Prints the panel to stdout. Messages drawn while the panel is closed are
/// held back and shown when it opens.
#[derive(Default)]
struct TerminalView {
    visible: bool,
    pending: Vec<(Who, String)>,
}

impl TerminalView {
    fn print(who: Who, html: &str) {
        let text = to_plain_text(html);
        match who {
            Who::User => println!("you> {}", text),
            Who::Agent => println!("agent> {}", text),
        }
    }
}

impl ChatView for TerminalView {
    fn set_panel_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            for (who, html) in self.pending.drain(..) {
                Self::print(who, &html);
            }
        }
    }

    fn focus_input(&mut self) {}

    fn clear_messages(&mut self) {
        self.pending.clear();
    }

    fn push_message(&mut self, who: Who, html: &str) {
        if self.visible {
            Self::print(who, html);
        } else {
            self.pending.push((who, html.to_string()));
        }
    }

    fn show_typing(&mut self, label: &str) {
        print!("... {}", label);
        let _ = std::io::stdout().flush();
    }

    fn hide_typing(&mut self) {
        // Erase the indicator line before the reply is printed.
        print!("\r\x1b[2K");
        let _ = std::io::stdout().flush();
    }

    fn scroll_to_bottom(&mut self) {}
}

fn print_help(quick_replies: &[String]) {
    println!("Commands: /open /close /clear /temp <value|off> /quick <n> /help /quit");
    for (i, q) in quick_replies.iter().enumerate() {
        println!("  /quick {}  {}", i, q);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = ChatArgs::parse();

    let config = WidgetConfig::from(&args);
    info!("Relay URL: {}", args.relay_url);
    info!("History: {}/{} (limit {})", args.history_dir, config.storage_key, config.history_limit);

    let store = Arc::new(FileStore::new(&args.history_dir));
    let transport = Arc::new(HttpTransport::new(args.relay_url.clone()));
    let mut widget = ChatWidget::new(config, store, transport, TerminalView::default());
    widget.set_temperature(args.temperature);
    widget.open_panel();
    print_help(widget.quick_replies());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "/quit" | "/exit" => break,
            "/help" => print_help(widget.quick_replies()),
            "/open" => widget.open_panel(),
            "/close" => widget.close_panel(),
            "/clear" => {
                widget.clear_history();
                println!("(history cleared)");
            }
            "/temp" => match rest.trim() {
                "off" | "" => widget.set_temperature(None),
                value => match value.parse::<f32>() {
                    Ok(t) => widget.set_temperature(Some(t)),
                    Err(_) => println!("(not a number: {})", value),
                },
            },
            "/quick" => match rest.trim().parse::<usize>() {
                Ok(index) => {
                    widget.quick_reply(index).await;
                }
                Err(_) => print_help(widget.quick_replies()),
            },
            _ => {
                if widget.panel() == PanelState::Closed {
                    widget.open_panel();
                }
                widget.submit(line).await;
            }
        }
    }

    Ok(())
}
