// src/noyau/erreurs.rs
//
// Taxonomie des erreurs du noyau.
// - ErreurEval        : échec d'évaluation d'UNE branche (=> repli texte, jamais propagé)
// - ErreurComparaison : défaillance interne du comparateur (=> repli brut)
// - ErreurConfig      : lecture / validation du fichier de tolérance

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErreurEval {
    #[error("Entrée vide")]
    Vide,
    #[error("caractère inattendu: '{0}'")]
    CaractereInattendu(char),
    #[error("nombre invalide: {0}")]
    NombreInvalide(String),
    #[error("expression invalide: {0}")]
    Syntaxe(&'static str),
    #[error("parenthèses non équilibrées")]
    Parentheses,
    #[error("symbole non évaluable: {0}")]
    Symbole(String),
    #[error("fonction {nom}: {attendu} argument(s) attendu(s), {recu} reçu(s)")]
    Arite {
        nom: &'static str,
        attendu: &'static str,
        recu: usize,
    },
    #[error("ensemble vide (pas de solution)")]
    EnsembleVide,
    #[error("résultat non réel (hors domaine)")]
    NonReel,
    #[error("indéfini: {0}")]
    Indefini(&'static str),
    #[error("dépassement de capacité (valeur finie trop grande pour f64)")]
    Depassement,
    #[error("résultat avec unité (angle), pas un nombre")]
    Unite,
    #[error("expression trop profonde (> {0} niveaux)")]
    TropProfond(usize),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErreurComparaison {
    #[error("trop de variantes après développement des ± ({0} > {max})", max = crate::noyau::options::MAX_BRANCHES)]
    TropDeVariantes(usize),
    #[error("marqueurs ± trop imbriqués (> {0} niveaux)")]
    ImbricationExcessive(usize),
}

#[derive(Error, Debug)]
pub enum ErreurConfig {
    #[error("lecture du fichier de tolérance impossible: {0}")]
    Lecture(#[from] std::io::Error),
    #[error("fichier de tolérance invalide: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("valeur de tolérance invalide: {champ} = {valeur}")]
    Valeur { champ: &'static str, valeur: f64 },
}
