// src/main.rs
//
// verif : point d'entrée ligne de commande
// ----------------------------------------
//   verif [--tolerance FICHIER.toml] [--explain] <SOUMISE> <CANONIQUE>
//
// Sortie : "true" / "false" sur stdout.
// Code de retour : 0 équivalentes, 1 non équivalentes, 2 configuration invalide.
// Journal : stderr, filtré par RUST_LOG (défaut "warn").

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use verif_reponse::noyau::{developper, evaluer_avec_demarche};
use verif_reponse::{check_with, Tolerance};

#[derive(Parser, Debug)]
#[command(name = "verif")]
#[command(about = "Vérifie qu'une réponse mathématique équivaut à la réponse attendue", long_about = None)]
#[command(version)]
struct Cli {
    /// Fichier TOML de tolérance (epsilon_absolu, fraction_relative, epsilon_entier)
    #[arg(long, value_name = "FICHIER")]
    tolerance: Option<PathBuf>,

    /// Affiche branches, formes normalisées, jetons, RPN et valeurs
    #[arg(long)]
    explain: bool,

    /// Réponse soumise
    #[arg(allow_hyphen_values = true)]
    soumise: String,

    /// Réponse canonique
    #[arg(allow_hyphen_values = true)]
    canonique: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match executer(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("erreur: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn executer(cli: &Cli) -> Result<bool> {
    let tol = match &cli.tolerance {
        Some(chemin) => Tolerance::depuis_fichier(chemin)
            .with_context(|| format!("chargement de {}", chemin.display()))?,
        None => Tolerance::default(),
    };
    tracing::debug!(?tol, "tolérance");

    if cli.explain {
        expliquer("soumise", &cli.soumise);
        expliquer("canonique", &cli.canonique);
    }

    let verdict = check_with(&cli.soumise, &cli.canonique, &tol);
    println!("{verdict}");
    Ok(verdict)
}

fn expliquer(role: &str, texte: &str) {
    let branches = match developper(texte) {
        Ok(b) => b,
        Err(e) => {
            println!("[{role}] {e}");
            return;
        }
    };

    println!("[{role}] {} branche(s)", branches.len());
    for b in branches {
        let (r, d) = evaluer_avec_demarche(&b);
        println!("  branche   : {b}");
        println!("  normalisée: {}", d.normalisee);
        if !d.jetons.is_empty() {
            println!("  jetons    : {}", d.jetons);
        }
        if !d.rpn.is_empty() {
            println!("  rpn       : {}", d.rpn);
        }
        if !d.arbre.is_empty() {
            println!("  arbre     : {}", d.arbre);
        }
        match r {
            Ok(v) => println!("  valeur    : {v}"),
            Err(e) => println!("  échec     : {e}"),
        }
    }
}
