use crate::document::Document;
use crate::term::Term;
use serde::{Deserialize, Serialize};

/// Ordered set of documents scored together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentCollection {
    documents: Vec<Document>,
}

impl DocumentCollection {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Replace every document.
    pub fn set_documents<I>(&mut self, documents: I) -> &mut Self
    where
        I: IntoIterator<Item = Document>,
    {
        self.clear_documents();
        self.documents.extend(documents);
        self
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn add_document(&mut self, document: Document) -> &mut Self {
        self.documents.push(document);
        self
    }

    pub fn clear_documents(&mut self) -> &mut Self {
        self.documents.clear();
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Number of documents containing `term`'s stem.
    pub fn document_frequency(&self, term: &Term) -> usize {
        self.documents.iter().filter(|doc| doc.has_term(term)).count()
    }
}

impl FromIterator<Document> for DocumentCollection {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for DocumentCollection {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocumentCollection {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}
