//! Wire and source-literal forms of proofs for external verifiers

use crate::core::{error::*, types::*};
use crate::proofs::proof::Proof;
use std::fmt;

/// Concatenate sibling digests into the fixed-width wire form
pub fn encode_siblings(siblings: &[Hash]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(siblings.len() * HASH_SIZE);
    for sibling in siblings {
        bytes.extend_from_slice(sibling.as_bytes());
    }
    bytes
}

/// Split the fixed-width wire form back into sibling digests
pub fn decode_siblings(bytes: &[u8]) -> Result<Vec<Hash>> {
    if bytes.len() % HASH_SIZE != 0 {
        return Err(MerkleError::invalid_proof_format(format!(
            "{} bytes is not a multiple of the {}-byte digest width",
            bytes.len(),
            HASH_SIZE
        )));
    }

    Ok(bytes
        .chunks_exact(HASH_SIZE)
        .map(|chunk| {
            let mut array = [0u8; HASH_SIZE];
            array.copy_from_slice(chunk);
            Hash::from_bytes(array)
        })
        .collect())
}

/// Sibling digests as `0x`-prefixed hex strings, the shape `bytes32[]` ABI arguments take
pub fn siblings_to_hex(proof: &Proof) -> Vec<String> {
    proof
        .path
        .iter()
        .map(|element| element.hash.to_prefixed_hex())
        .collect()
}

/// Renders a proof as Solidity statements for pasting into contract tests
pub struct SolidityProof<'a> {
    proof: &'a Proof,
    suffix: String,
}

impl<'a> SolidityProof<'a> {
    pub fn new(proof: &'a Proof) -> Self {
        Self {
            proof,
            suffix: String::new(),
        }
    }

    /// Append the leaf index to every variable name, so several proofs can share a scope
    pub fn indexed(proof: &'a Proof) -> Self {
        Self {
            proof,
            suffix: proof.leaf_index.to_string(),
        }
    }
}

impl fmt::Display for SolidityProof<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.suffix;
        let proof = self.proof;
        writeln!(f, "bytes32 leaf{} = {};", s, proof.leaf.to_prefixed_hex())?;
        writeln!(f, "bytes32 root{} = {};", s, proof.root.to_prefixed_hex())?;
        writeln!(f, "uint256 index{} = {};", s, proof.leaf_index)?;
        write!(
            f,
            "bytes32[] memory proof{} = new bytes32[]({});",
            s,
            proof.len()
        )?;
        for (i, element) in proof.path.iter().enumerate() {
            write!(f, "\nproof{}[{}] = {};", s, i, element.hash.to_prefixed_hex())?;
        }
        Ok(())
    }
}

/// Several proofs in one block, sharing a single root declaration
pub struct SolidityBlock<'a>(pub &'a [Proof]);

impl fmt::Display for SolidityBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.0.first() {
            writeln!(f, "bytes32 root = {};", first.root.to_prefixed_hex())?;
        }
        for proof in self.0 {
            let i = proof.leaf_index;
            writeln!(f, "\n// Proof for leaf {}", i)?;
            writeln!(f, "bytes32 leaf{} = {};", i, proof.leaf.to_prefixed_hex())?;
            writeln!(f, "bytes32[] memory proof{} = new bytes32[]({});", i, proof.len())?;
            for (j, element) in proof.path.iter().enumerate() {
                writeln!(f, "proof{}[{}] = {};", i, j, element.hash.to_prefixed_hex())?;
            }
        }
        Ok(())
    }
}
