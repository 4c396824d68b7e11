// src/noyau/tolerance.rs
//
// Politique de tolérance numérique (configurable).
//
// Exemple de fichier TOML :
//
//   epsilon_absolu = 0.05
//   fraction_relative = 0.001
//   epsilon_entier = 1e-6
//
// Champs absents => valeurs par défaut.

use std::path::Path;

use serde::Deserialize;

use super::erreurs::ErreurConfig;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tolerance {
    /// Écart absolu toujours accepté (petites valeurs).
    pub epsilon_absolu: f64,
    /// Fraction de |canonique| acceptée (grandes valeurs).
    pub fraction_relative: f64,
    /// Distance max à l'entier le plus proche pour qu'une valeur “soit” un entier.
    pub epsilon_entier: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon_absolu: 0.05,
            fraction_relative: 0.001,
            epsilon_entier: 1e-6,
        }
    }
}

impl Tolerance {
    pub fn depuis_toml(texte: &str) -> Result<Self, ErreurConfig> {
        let t: Tolerance = toml::from_str(texte)?;
        t.valider()
    }

    pub fn depuis_fichier(chemin: &Path) -> Result<Self, ErreurConfig> {
        let texte = std::fs::read_to_string(chemin)?;
        Self::depuis_toml(&texte)
    }

    /// Refuse NaN, infinis et négatifs.
    pub fn valider(self) -> Result<Self, ErreurConfig> {
        for (champ, valeur) in [
            ("epsilon_absolu", self.epsilon_absolu),
            ("fraction_relative", self.fraction_relative),
            ("epsilon_entier", self.epsilon_entier),
        ] {
            if !valeur.is_finite() || valeur < 0.0 {
                return Err(ErreurConfig::Valeur { champ, valeur });
            }
        }
        Ok(self)
    }

    /// Écart autorisé autour de la valeur canonique.
    pub fn marge(&self, canonique: f64) -> f64 {
        self.epsilon_absolu
            .max((canonique * self.fraction_relative).abs())
    }

    /// Some(n) si x est à moins de epsilon_entier d'un entier n.
    pub fn entier_proche(&self, x: f64) -> Option<f64> {
        let n = x.round();
        ((x - n).abs() <= self.epsilon_entier).then_some(n)
    }
}
