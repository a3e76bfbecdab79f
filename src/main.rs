use amina_client::api::{HttpChatBackend, OrsPlanner, OverpassFinder};
use amina_client::canvas::MemoryCanvas;
use amina_client::chat::ChatWidget;
use amina_client::config;
use amina_client::geo::NoLocator;
use amina_client::map::{MapWidget, StationRow, Status, StatusKind};
use amina_client::structs::MessageRole;

use std::error::Error;
use std::io::{BufRead, Write};

//////////////////////////////////////////////////////////
// Terminal frontend
//////////////////////////////////////////////////////////

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv::dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting Amina terminal client ...");

    let api_key = config::ors_api_key()?;

    let mut chat = ChatWidget::new(HttpChatBackend::new());
    let mut map = MapWidget::new(MemoryCanvas::new(), OverpassFinder::new(), OrsPlanner::new(api_key));

    // No positioning facility on a terminal; this lands on the default
    // location and says so, the same as a denied browser permission.
    map.init(&NoLocator).await;
    print_status(map.status());

    println!("Comandos: /buscar  /rota <n>  /sair  — qualquer outro texto vai para o chat.");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line == "/sair" {
            break;
        } else if line == "/buscar" {
            map.search_stations().await;
            print_status(map.status());
            print_rows(map.rows());
        } else if let Some(arg) = line.strip_prefix("/rota") {
            match arg.trim().parse::<usize>() {
                Ok(n) if n >= 1 && n <= map.rows().len() => {
                    map.select_station(n - 1).await;
                    print_status(map.status());
                    print_rows(map.rows());
                }
                _ => println!("Uso: /rota <número da delegacia>"),
            }
        } else {
            let before = chat.transcript().len();
            chat.submit(line).await;
            for message in &chat.transcript()[before..] {
                let prefix = match message.role {
                    MessageRole::User => "você",
                    MessageRole::Assistant => "amina",
                    MessageRole::Error => "erro",
                };
                println!("[{}] {}", prefix, message.text);
            }
        }
    }

    Ok(())
}

fn print_status(status: &Status) {
    let kind = match status.kind {
        StatusKind::Info => "info",
        StatusKind::Loading => "...",
        StatusKind::Success => "ok",
        StatusKind::Error => "erro",
    };
    println!("[{}] {}", kind, status.text);
}

fn print_rows(rows: &[StationRow]) {
    if rows.is_empty() {
        println!("Nenhuma delegacia encontrada nesta área");
        return;
    }
    for (i, row) in rows.iter().enumerate() {
        println!("{:>2}. {}  ({})", i + 1, row.station.name, row.distance_label);
    }
}
