use async_trait::async_trait;
use class_slots::board::{Board, Prompter, SLOT_INPUTS};
use class_slots::client::ClassesClient;
use class_slots::settings::ClientSettings;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

const HELP: &str = "commands: list | new | dup <class> | del <class> | assign <class> <slot> | quit";

struct Terminal {
    lines: Lines<BufReader<Stdin>>,
    out: Stdout,
}

impl Terminal {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            out: tokio::io::stdout(),
        }
    }

    async fn print(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes()).await;
        let _ = self.out.flush().await;
    }

    /// `None` on end of input.
    async fn ask(&mut self, question: &str) -> Option<String> {
        self.print(question).await;
        self.lines.next_line().await.ok().flatten()
    }
}

#[async_trait]
impl Prompter for Terminal {
    async fn confirm(&mut self, message: &str) -> bool {
        matches!(
            self.ask(&format!("{message} [y/N] ")).await.as_deref().map(str::trim),
            Some("y" | "Y" | "yes")
        )
    }

    async fn prompt(&mut self, message: &str) -> Option<String> {
        self.ask(&format!("{message} ")).await
    }
}

async fn fill_form(board: &mut Board, terminal: &mut Terminal) -> Option<()> {
    board.open_form();
    let name = terminal.ask("Class name: ").await?;
    board.set_name(name);
    let date = terminal.ask("Date (optional): ").await?;
    board.set_date(date.trim());
    for index in 0..SLOT_INPUTS {
        let label = terminal
            .ask(&format!("Time slot {} (e.g. 12:00-12:10): ", index + 1))
            .await?;
        board.set_slot(index, label);
    }
    Some(())
}

fn parse_ids<const N: usize>(args: &[&str]) -> Option<[i64; N]> {
    if args.len() != N {
        return None;
    }
    let mut ids = [0; N];
    for (slot, arg) in ids.iter_mut().zip(args) {
        *slot = arg.parse().ok()?;
    }
    Some(ids)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = ClientSettings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let mut board = Board::new(ClassesClient::new(settings.api_url));
    let mut terminal = Terminal::new();

    board.refresh().await;
    terminal.print(&board.render()).await;
    terminal.print(&format!("{HELP}\n")).await;

    while let Some(line) = terminal.ask("> ").await {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((command, args)) = words.split_first() else {
            continue;
        };
        match *command {
            "list" => board.refresh().await,
            "new" => {
                if fill_form(&mut board, &mut terminal).await.is_none() {
                    break;
                }
                if let Err(err) = board.submit_create().await {
                    terminal.print(&format!("{err}\n")).await;
                    board.cancel_form();
                    continue;
                }
            }
            "dup" => match parse_ids::<1>(args) {
                Some([class_id]) => board.duplicate(class_id, &mut terminal).await,
                None => {
                    terminal.print("usage: dup <class>\n").await;
                    continue;
                }
            },
            "del" => match parse_ids::<1>(args) {
                Some([class_id]) => board.delete(class_id, &mut terminal).await,
                None => {
                    terminal.print("usage: del <class>\n").await;
                    continue;
                }
            },
            "assign" => match parse_ids::<2>(args) {
                Some([class_id, slot_id]) => {
                    board.assign(class_id, slot_id, &mut terminal).await
                }
                None => {
                    terminal.print("usage: assign <class> <slot>\n").await;
                    continue;
                }
            },
            "quit" | "exit" => break,
            _ => {
                terminal.print(&format!("{HELP}\n")).await;
                continue;
            }
        }
        terminal.print(&board.render()).await;
    }
    Ok(())
}
