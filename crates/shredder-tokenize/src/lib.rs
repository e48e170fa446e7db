//! Morphological analysis backed by a vibrato system dictionary.
//!
//! Dictionaries are the zstd-compressed `system.dic.zst` files published for
//! vibrato (IPADIC or UniDic builds). Feature strings are passed through
//! untouched; column interpretation lives in `shredder-morph`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use shredder_types::{Analyzer, Morpheme};
use tracing::info;
use vibrato::{Dictionary, Tokenizer};

pub struct VibratoAnalyzer {
    tokenizer: Tokenizer,
}

impl VibratoAnalyzer {
    /// Load a zstd-compressed system dictionary.
    pub fn load(dict_path: impl AsRef<Path>) -> Result<Self> {
        let dict_path = dict_path.as_ref();
        info!("loading tokenizer dictionary from {}", dict_path.display());

        let file = File::open(dict_path)
            .with_context(|| format!("open tokenizer dictionary {}", dict_path.display()))?;
        let decoder = zstd::stream::read::Decoder::new(BufReader::new(file))
            .with_context(|| format!("decompress {}", dict_path.display()))?;
        let dict = Dictionary::read(decoder)
            .with_context(|| format!("read tokenizer dictionary {}", dict_path.display()))?;

        Ok(Self::from_dictionary(dict))
    }

    pub fn from_dictionary(dict: Dictionary) -> Self {
        Self {
            tokenizer: Tokenizer::new(dict),
        }
    }
}

impl Analyzer for VibratoAnalyzer {
    fn analyze(&self, sentence: &str) -> Vec<Morpheme> {
        let mut worker = self.tokenizer.new_worker();
        worker.reset_sentence(sentence);
        worker.tokenize();

        (0..worker.num_tokens())
            .map(|i| {
                let token = worker.token(i);
                Morpheme::new(token.surface(), token.feature())
            })
            .collect()
    }
}
