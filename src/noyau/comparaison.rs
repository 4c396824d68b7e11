// src/noyau/comparaison.rs
//
// Comparateur d'équivalence : soumise vs canonique -> bool (toujours).
//
// Repli en couches :
// 1) toutes les branches évaluées  -> comparaison numérique triée (tolérance)
// 2) au moins un échec d'évaluation -> formes normalisées triées, jointes par ";"
// 3) défaillance interne (panique, ErreurComparaison) -> comparaison brute
//    (minuscules, sans espaces, virgule -> point)

use std::panic;

use tracing::{debug, warn};

use super::erreurs::{ErreurComparaison, ErreurEval};
use super::eval::evaluer;
use super::normalise::normaliser;
use super::options::developper;
use super::tolerance::Tolerance;

/// Tolérance par défaut.
pub fn is_answer_correct(soumise: &str, canonique: &str) -> bool {
    check_with(soumise, canonique, &Tolerance::default())
}

/// Ne panique pas, ne propage rien.
pub fn check_with(soumise: &str, canonique: &str, tol: &Tolerance) -> bool {
    if soumise.trim().is_empty() {
        debug!("réponse vide");
        return false;
    }

    match panic::catch_unwind(|| comparer(soumise, canonique, tol)) {
        Ok(Ok(verdict)) => verdict,
        Ok(Err(e)) => {
            warn!(erreur = %e, "comparaison interrompue, repli brut");
            repli_brut(soumise, canonique)
        }
        Err(charge) => {
            let message = charge
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| charge.downcast_ref::<String>().cloned())
                .unwrap_or_default();
            warn!(panique = %message, "panique pendant la comparaison, repli brut");
            repli_brut(soumise, canonique)
        }
    }
}

/// Couches 1 et 2. Une Err ici est une défaillance interne (couche 3).
pub(crate) fn comparer(
    soumise: &str,
    canonique: &str,
    tol: &Tolerance,
) -> Result<bool, ErreurComparaison> {
    let norm_s: Vec<String> = developper(soumise)?.iter().map(|b| normaliser(b)).collect();
    let norm_c: Vec<String> = developper(canonique)?.iter().map(|b| normaliser(b)).collect();

    let vals_s: Result<Vec<f64>, ErreurEval> = norm_s.iter().map(|n| evaluer(n)).collect();
    let vals_c: Result<Vec<f64>, ErreurEval> = norm_c.iter().map(|n| evaluer(n)).collect();

    match (vals_s, vals_c) {
        (Ok(mut a), Ok(mut b)) => {
            if a.len() != b.len() {
                debug!(soumises = a.len(), canoniques = b.len(), "nombre de branches différent");
                return Ok(false);
            }
            a.sort_by(f64::total_cmp);
            b.sort_by(f64::total_cmp);

            let verdict = a
                .iter()
                .zip(&b)
                .all(|(&x, &y)| valeurs_equivalentes(x, y, tol));
            debug!(?a, ?b, verdict, "comparaison numérique");
            Ok(verdict)
        }
        (r_s, r_c) => {
            let echec = r_s.err().or(r_c.err());
            let a = chaine_triee(norm_s);
            let b = chaine_triee(norm_c);
            let verdict = a == b;
            debug!(?echec, %a, %b, verdict, "repli sur les formes normalisées");
            Ok(verdict)
        }
    }
}

/// Une paire (soumise, canonique) après tri.
pub fn valeurs_equivalentes(soumise: f64, canonique: f64, tol: &Tolerance) -> bool {
    // ±∞ : même signe exigé
    if soumise.is_infinite() || canonique.is_infinite() {
        return soumise == canonique;
    }
    // deux entiers (à epsilon près) : égalité stricte des arrondis, 1000 ≠ 1001
    if let (Some(a), Some(b)) = (tol.entier_proche(soumise), tol.entier_proche(canonique)) {
        return a == b;
    }
    (soumise - canonique).abs() <= tol.marge(canonique)
}

fn chaine_triee(mut formes: Vec<String>) -> String {
    formes.sort();
    formes.join(";")
}

/// Couche 3 : plus rien n'est interprété.
pub fn repli_brut(soumise: &str, canonique: &str) -> bool {
    brut(soumise) == brut(canonique)
}

fn brut(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}
