use clap::Parser;
use dungeongen::dungeon::graph::{build_room_graph, is_spanning_tree};
use dungeongen::dungeon::png::DungeonImage;
use dungeongen::survey::{SurveySettings, survey};
use dungeongen::DungeonParams;
use std::path::PathBuf;

/// Генератор подземелий для March Into The Dark
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML (по умолчанию встроенные типы комнат)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Переопределяет сид из конфигурации
    #[arg(short, long)]
    seed: Option<u64>,

    /// Переопределяет целевое число комнат
    #[arg(long)]
    size: Option<usize>,

    /// Путь для сохранения изображения
    #[arg(short, long, default_value = "dungeon.png")]
    output: PathBuf,

    /// Путь для сохранения раскладки в JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Вместо одного подземелья сгенерировать RUNS штук подряд и вывести статистику
    #[arg(long, value_name = "RUNS")]
    survey: Option<u64>,

    /// Проверить, что раскладка — связное дерево, и вывести результат
    #[arg(long)]
    check: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => {
            println!("Загрузка конфигурации из {}...", path.display());
            DungeonParams::from_toml_file(&path.to_string_lossy())?
        }
        None => DungeonParams::default(),
    };
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }
    if let Some(size) = cli.size {
        params.size = size;
    }

    let registry = params.build_registry()?;

    if let Some(runs) = cli.survey {
        println!("Обзор: {runs} подземелий по {} комнат...", params.size);
        let report = survey(
            &registry,
            &SurveySettings {
                size: params.size,
                seeds: params.seed..params.seed.saturating_add(runs),
                max_rejections: params.max_rejections,
            },
        )?;
        for (name, count) in &report.counts {
            println!("  {name}: {count} ({:.1}%)", report.share(name) * 100.0);
        }
        println!(
            "Средняя удалённость выхода: {:.2}",
            report.mean_exit_distance
        );
        return Ok(());
    }

    println!(
        "Генерация подземелья (сид: {}, размер: {})...",
        params.seed, params.size
    );
    let dungeon = params.generate(&registry)?;

    if cli.check {
        let graph = build_room_graph(&dungeon);
        if !is_spanning_tree(&graph) {
            log::error!("generated layout is not a tree");
            return Err("проверка не пройдена: раскладка не является деревом".into());
        }
        println!(
            "Проверка: дерево из {} комнат и {} переходов",
            graph.node_count(),
            graph.edge_count()
        );
    }

    for (name, count) in dungeon.layout().counts {
        println!("  {name}: {count}");
    }
    if let Some(exit) = dungeon.exit() {
        println!(
            "Выход в ({}, {}), расстояние от входа {}",
            exit.position.x, exit.position.y, exit.distance
        );
    }

    println!("Сохранение в {:?}", cli.output);
    DungeonImage::render(&dungeon, &params.render).save_as_png(&cli.output.to_string_lossy())?;

    if let Some(path) = &cli.json {
        println!("Сохранение раскладки в {path:?}");
        dungeon.layout().save_as_json(&path.to_string_lossy())?;
    }

    println!("\nГотово! Подземелье из {} комнат сохранено.", dungeon.len());
    Ok(())
}
