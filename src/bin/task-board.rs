//! A terminal front end for the task board.
//!
//! Set `TASK_BOARD_URL` and `TASK_BOARD_KEY` to use a remote store, otherwise tasks are kept in a local file.
//! Set `RUST_LOG` to see more about what happens.

use std::io::{stdin, stdout, BufRead, Write};
use std::sync::Arc;

use task_board::board::{now, today, TaskBoard};
use task_board::config::{self, GatewayConfig};
use task_board::gateway::{LocalStore, RestGateway};
use task_board::traits::TaskGateway;
use task_board::view::{render_text, BoardView, SwipeOutcome, SwipeTracker};
use task_board::{StoreError, TaskId};

const HELP: &str = "\
Commands:
  add <text>        add a task to the shown day
  time <HH:MM>      time of day for the next tasks
  date <YYYY-MM-DD> show another day
  jump <n>          show the n-th day of the top bar
  toggle <n>        mark the n-th task as done / not done
  del <n>           delete the n-th task
  swipe <n> <dx>    drag the n-th task sideways by dx pixels
  clear             delete every task of the shown day
  reload            fetch the tasks again
  help, quit";

fn open_gateway() -> Result<Arc<dyn TaskGateway>, StoreError> {
    match GatewayConfig::from_env()? {
        Some(config) => {
            log::info!("Using the remote store at {:?}", config.resource);
            let gateway: Arc<dyn TaskGateway> = Arc::new(RestGateway::new(config)?);
            Ok(gateway)
        },
        None => {
            let path = config::local_store_file();
            log::info!("No {} set, using the local store {:?}", config::ENV_URL, path);
            let gateway: Arc<dyn TaskGateway> = Arc::new(LocalStore::from_file(&path)?);
            Ok(gateway)
        }
    }
}

/// Returns the id of the n-th (1-based) shown task
fn nth_task<G: TaskGateway>(board: &TaskBoard<G>, arg: &str) -> Option<TaskId> {
    let n: usize = arg.trim().parse().ok()?;
    n.checked_sub(1)
        .and_then(|i| board.visible_tasks().get(i).map(|t| t.id().clone()))
}

fn failure_line(action: &str, err: &StoreError) -> String {
    format!("! Unable to {}: {}", action, err.message())
}

/// Failures are only printed, the main screen keeps showing the last known state
fn report<T>(action: &str, result: Result<T, StoreError>) {
    if let Err(err) = result {
        eprintln!("{}", failure_line(action, &err));
    }
}

fn ask(question: &str) -> bool {
    print!("{} [y/N] ", question);
    let _ = stdout().flush();
    let mut answer = String::new();
    if stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let gateway = match open_gateway() {
        Ok(g) => g,
        Err(err) => {
            eprintln!("Unable to open the task store: {}", err);
            std::process::exit(1);
        }
    };

    let mut board = TaskBoard::new(gateway);
    report("load tasks", board.load().await);

    println!("{}", HELP);
    loop {
        let view = BoardView::build(&board, &today(), now());
        println!("\n{}", render_text(&view));
        print!("> ");
        let _ = stdout().flush();

        let mut line = String::new();
        match stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {},
        }
        let line = line.trim();
        let (command, arg) = match line.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match command {
            "" => {},
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "add" => {
                board.set_draft_text(arg);
                report("add a task", board.add_task().await);
            },
            "time" => board.set_draft_time(arg),
            "date" => board.select_date(arg),
            "jump" => {
                let jumped = arg.parse::<usize>().ok()
                    .and_then(|n| n.checked_sub(1))
                    .map(|i| board.jump_to(i))
                    .unwrap_or(false);
                if jumped == false {
                    println!("No such day");
                }
            },
            "toggle" => match nth_task(&board, arg) {
                None => println!("No such task"),
                Some(id) => report("toggle a task", board.toggle(&id).await),
            },
            "del" => match nth_task(&board, arg) {
                None => println!("No such task"),
                Some(id) => report("delete a task", board.delete(&id).await),
            },
            "swipe" => {
                let mut parts = arg.split_whitespace();
                let id = parts.next().and_then(|n| nth_task(&board, n));
                let dx = parts.next().and_then(|dx| dx.parse::<f32>().ok());
                match (id, dx) {
                    (Some(id), Some(dx)) => {
                        let mut tracker = SwipeTracker::start(id, 0.0);
                        tracker.move_to(dx);
                        if let SwipeOutcome::Delete(id) = tracker.release() {
                            report("delete a task", board.delete(&id).await);
                        }
                    },
                    _ => println!("Usage: swipe <n> <dx>"),
                }
            },
            "clear" => match board.request_day_deletion() {
                None => println!("Nothing to delete"),
                Some(deletion) => {
                    if ask(&deletion.prompt()) {
                        report("delete a day", board.confirm_day_deletion(deletion).await);
                    } else {
                        deletion.cancel();
                    }
                }
            },
            "reload" => report("load tasks", board.load().await),
            other => println!("Unknown command {:?}. Type 'help'", other),
        }
    }
}
