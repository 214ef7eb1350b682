use rhymes::{Portmanteau, RhymeClient, RhymeError, RhymeRecord, WordInfo};
use tracing_subscriber::EnvFilter;
use utilities::{closest_command, input, parse_max_results};

mod utilities;

const ENDPOINT_VAR: &str = "RHYME_FINDER_ENDPOINT";

const COMMANDS: &[&str] = &[
    "rhyme",
    "info",
    "portmanteau",
    "lang",
    "max",
    "help",
    "quit",
];

/// Per-session query settings changed with `lang` and `max`.
struct Settings {
    lang: Option<String>,
    max_results: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut builder = RhymeClient::builder();
    if let Ok(endpoint) = std::env::var(ENDPOINT_VAR) {
        tracing::info!(%endpoint, "using rhyme service from environment");
        builder = builder.base_url(endpoint);
    }
    let client = builder.build()?;
    let mut settings = Settings {
        lang: None,
        max_results: None,
    };

    loop {
        let line = input(">> ")?;
        if line.is_empty() {
            // stdin closed
            break;
        }
        let line = line.trim();
        let mut command_parts = line.split_ascii_whitespace();
        if let Some(command) = command_parts.next() {
            let argument = command_parts.collect::<Vec<&str>>().join(" ");
            match command {
                "exit" | "quit" | "e" | "q" => {
                    break;
                }
                "rhyme" | "rhymes" | "r" => {
                    find_rhymes(&client, &settings, &argument).await;
                }
                "info" | "i" => {
                    show_word_info(&client, &settings, &argument).await;
                }
                "portmanteau" | "pm" => {
                    find_portmanteaus(&client, &settings, &argument).await;
                }
                "lang" => {
                    if argument.is_empty() {
                        println!(
                            "Language is {}.",
                            settings
                                .lang
                                .as_deref()
                                .unwrap_or(client.config().default_language.as_str())
                        );
                    } else {
                        match rhymes::language_code(&argument) {
                            Ok(code) => settings.lang = Some(code),
                            Err(error) => report_error(error),
                        }
                    }
                }
                "max" => match parse_max_results(argument) {
                    Some(max_results) => settings.max_results = max_results,
                    None => println!("Expected a positive number or \"none\"."),
                },
                "help" | "h" | "?" => print_help(),
                other => match closest_command(other, COMMANDS) {
                    Some(suggestion) => {
                        println!("Unknown command {other}. Did you mean {suggestion}?")
                    }
                    None => println!("Unknown command {other}. Type help for a list of commands."),
                },
            }
        }
    }
    Ok(())
}

async fn find_rhymes(client: &RhymeClient, settings: &Settings, word: &str) {
    match client
        .rhymes(word, settings.lang.as_deref(), settings.max_results)
        .await
    {
        Ok(rhymes) if rhymes.len() == 0 => println!("No rhymes found for '{word}'."),
        Ok(rhymes) => {
            println!("Rhymes for '{word}':");
            for rhyme in rhymes {
                print_rhyme(&rhyme);
            }
        }
        Err(error) => report_error(error),
    }
}

async fn show_word_info(client: &RhymeClient, settings: &Settings, word: &str) {
    match client.word_info(word, settings.lang.as_deref()).await {
        Ok(info) => print_word_info(&info),
        Err(error) => report_error(error),
    }
}

async fn find_portmanteaus(client: &RhymeClient, settings: &Settings, word: &str) {
    match client
        .portmanteaus(word, settings.lang.as_deref(), settings.max_results)
        .await
    {
        Ok(blends) if blends.is_empty() => println!("No portmanteaus found for '{word}'."),
        Ok(blends) => blends.iter().for_each(print_portmanteau),
        Err(error) => report_error(error),
    }
}

fn report_error(error: RhymeError) {
    match error {
        RhymeError::InvalidArgument(message) => println!("{message}"),
        other => {
            tracing::debug!(error = ?other, "lookup failed");
            println!("Encountered an error while talking to the rhyme service: {other}");
        }
    }
}

fn print_rhyme(rhyme: &RhymeRecord) {
    let marker = if rhyme.is_perfect() { "*" } else { " " };
    let mut details = Vec::new();
    if let Some(score) = rhyme.score() {
        details.push(format!("score {score}"));
    }
    if let Some(syllables) = rhyme.syllables() {
        details.push(format!("{syllables} syllables"));
    }
    if rhyme.flags().is_some_and(|flags| flags.is_offensive()) {
        details.push("offensive".to_owned());
    }
    println!("  {marker} {rhyme:<20} {}", details.join(", "));
}

fn print_word_info(info: &WordInfo) {
    println!("Showing info for '{}':", info.word().unwrap_or_default());
    if let Some(pron) = info.pron() {
        println!("    pronunciation: {pron}");
    }
    if let Some(ipa) = info.ipa() {
        println!("    ipa: {ipa}");
    }
    if let Some(syllables) = info.syllables() {
        println!("    syllables: {syllables}");
    }
    if let Some(freq) = info.freq() {
        println!("    frequency: {freq}/{}", rhymes::MAX_FREQUENCY);
    }
    if let Some(flags) = info.flags() {
        if !flags.pronunciation_confident() {
            println!("    (pronunciation was generated automatically)");
        }
        if flags.is_offensive() {
            println!("    (offensive)");
        }
    }
}

fn print_portmanteau(blend: &Portmanteau) {
    println!(
        "  {} <- {}",
        blend.spellings().join(" / "),
        blend.source_words().join(" + ")
    );
}

fn print_help() {
    println!("Commands:");
    println!("    rhyme <word>        list words that rhyme with <word> (* marks perfect rhymes)");
    println!("    info <word>         show pronunciation details");
    println!("    portmanteau <word>  list blends of <word> with other words");
    println!("    lang [code]         show or set the ISO 639-1 language code");
    println!("    max <n|none>        cap the number of results");
    println!("    quit                leave");
}
